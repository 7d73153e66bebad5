//! Assistant panel orchestration
//!
//! Ties the conversation store, both speech controllers, the reply formatter
//! and the request dispatcher into one conversation panel. The panel owns the
//! ordering rules: the user's message is appended before its request leaves,
//! stale replies land in history but never trigger speech, and closing the
//! panel cancels both voice resources.

pub mod config;

pub use config::PanelConfig;

use crate::conversation::{ConversationStore, Message};
use crate::dispatch::{PendingReply, RequestDispatcher};
use crate::language::Language;
use crate::reply::format_reply;
use crate::speech::ports::{RecognitionPort, SessionId, SynthesisPort, UtteranceId};
use crate::speech::{OutputState, SpeechInputController, SpeechOutputController};
use crate::{AssistantError, Result};
use tracing::{debug, info, warn};

/// Synthetic assistant reply appended when a dispatch fails
pub const FALLBACK_REPLY: &str = "Sorry, something went wrong.";

/// Shared speech state of the whole panel (not per message)
///
/// At most one of a listening session and a speaking utterance is ever
/// active; this enum reports which, with listening taking priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechState {
    Idle,
    Listening,
    AwaitingReply,
    Speaking,
    Paused,
}

/// What applying one backend reply did to the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Messages appended to the conversation
    pub appended: usize,

    /// Whether the reply was handed to the synthesis engine
    pub spoke: bool,
}

pub struct AssistantPanel {
    config: PanelConfig,
    store: ConversationStore,
    dispatcher: RequestDispatcher,
    input: SpeechInputController,
    output: SpeechOutputController,
    language: Language,

    /// Sequence number of the most recently dispatched request; replies
    /// carrying an older number are stale and must not trigger speech.
    latest_seq: u64,
    awaiting: bool,
}

impl AssistantPanel {
    pub fn new(
        config: PanelConfig,
        recognition: Box<dyn RecognitionPort>,
        synthesis: Box<dyn SynthesisPort>,
    ) -> Result<Self> {
        config.validate()?;
        info!(endpoint = %config.endpoint, "assistant panel created");
        Ok(Self {
            store: ConversationStore::new(config.greeting.clone()),
            dispatcher: RequestDispatcher::new(config.endpoint.clone()),
            input: SpeechInputController::new(recognition),
            output: SpeechOutputController::new(synthesis),
            language: config.default_language,
            latest_seq: 0,
            awaiting: false,
            config,
        })
    }

    /// The panel's conversation history
    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Change the conversation language
    ///
    /// Takes effect on the next recognition, synthesis or dispatch action;
    /// anything already in flight keeps the locale it started with.
    pub fn set_language(&mut self, language: Language) {
        debug!(%language, "language changed");
        self.language = language;
    }

    /// Current shared speech state of the panel
    pub fn speech_state(&self) -> SpeechState {
        if self.input.is_listening() {
            return SpeechState::Listening;
        }
        match self.output.state() {
            OutputState::Speaking => SpeechState::Speaking,
            OutputState::Paused => SpeechState::Paused,
            OutputState::Idle => {
                if self.awaiting {
                    SpeechState::AwaitingReply
                } else {
                    SpeechState::Idle
                }
            }
        }
    }

    /// Submit a user message
    ///
    /// The user message is appended synchronously, before the request is
    /// dispatched, so the user always sees their own message immediately.
    /// Submitting completes the user's input: any live capture session is
    /// aborted and any utterance still playing is canceled, so neither voice
    /// resource can overlap the reply. Returns `None` for blank input;
    /// otherwise the pending reply the host must await and feed back through
    /// [`apply_reply`](Self::apply_reply).
    pub fn submit(&mut self, text: &str) -> Option<PendingReply> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        self.store.append(vec![Message::user(trimmed)]);
        self.input.abort();
        self.output.cancel();

        let pending = self.dispatcher.send(trimmed, self.language);
        self.latest_seq = pending.seq();
        self.awaiting = true;
        debug!(seq = self.latest_seq, "turn started");
        Some(pending)
    }

    /// Apply a completed dispatch
    ///
    /// Replies are always appended, even stale ones, so the history is never
    /// lossy; but only the reply matching the latest issued sequence number
    /// may reach the synthesis engine. A failed dispatch appends the fixed
    /// fallback reply so the conversation stays self-explanatory.
    pub fn apply_reply(&mut self, seq: u64, outcome: Result<String>) -> TurnOutcome {
        let latest = seq == self.latest_seq;
        if latest {
            self.awaiting = false;
        }

        match outcome {
            Ok(raw) => {
                let segments = format_reply(&raw);
                let batch: Vec<Message> = segments.iter().map(Message::from_segment).collect();
                let appended = batch.len();
                self.store.append(batch);

                let mut spoke = false;
                if latest && self.config.auto_speak {
                    match self.output.speak(&raw, self.language) {
                        Ok(_) => spoke = true,
                        Err(e) => warn!("auto-speak skipped: {}", e),
                    }
                } else if !latest {
                    debug!(seq, latest_seq = self.latest_seq, "stale reply appended silently");
                }
                TurnOutcome { appended, spoke }
            }
            Err(e) => {
                warn!(seq, "dispatch failed: {}", e);
                self.store.append(vec![Message::assistant(FALLBACK_REPLY)]);
                TurnOutcome {
                    appended: 1,
                    spoke: false,
                }
            }
        }
    }

    /// Begin a voice capture session in the current language
    ///
    /// Playback is canceled first so at most one of listening and speaking is
    /// ever active. A host without a recognition engine yields
    /// `CapabilityUnavailable` immediately, leaving the panel usable by text.
    pub fn start_voice_input(&mut self) -> Result<SessionId> {
        self.output.cancel();
        self.input.start_listening(self.language)
    }

    /// Apply a recognition result; returns the transcript for the composer
    /// when the session is still current
    pub fn recognition_result(&mut self, session: SessionId, transcript: String) -> Option<String> {
        self.input.on_result(session, transcript)
    }

    /// Apply a recognition error; the conversation history is untouched
    pub fn recognition_error(
        &mut self,
        session: SessionId,
        reason: &str,
    ) -> Option<AssistantError> {
        self.input.on_error(session, reason)
    }

    /// Apply an utterance-started event from the host
    pub fn playback_started(&mut self, utterance: UtteranceId) {
        self.output.on_started(utterance);
    }

    /// Apply an utterance-ended event from the host
    pub fn playback_ended(&mut self, utterance: UtteranceId) {
        self.output.on_ended(utterance);
    }

    /// Pause or resume playback based on the engine's reported state
    pub fn toggle_speech(&mut self) {
        self.output.toggle();
    }

    /// Stop playback immediately
    pub fn cancel_speech(&mut self) {
        self.output.cancel();
    }

    /// Clear the conversation back to the greeting
    ///
    /// A request already in flight keeps running and will append its reply
    /// when it returns; discarding post-reset replies is a host policy.
    pub fn reset_conversation(&mut self) {
        self.store.reset();
    }

    /// Release both voice resources; called when the panel goes away so no
    /// audio or capture session outlives it
    pub fn close(&mut self) {
        self.input.abort();
        self.output.cancel();
        info!("assistant panel closed");
    }
}
