//! Speech output controller
//!
//! Wraps the host synthesis engine behind a three-state machine and enforces
//! the single-utterance rule: `speak` unconditionally cancels whatever was
//! playing before starting the new utterance. Pause/resume transitions ask
//! the engine for ground truth instead of trusting a locally tracked flag.

use crate::language::Language;
use crate::speech::ports::{SynthesisPort, UtteranceId};
use crate::{AssistantError, Result};
use tracing::debug;

/// Playback state for voice output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputState {
    /// Nothing is playing
    Idle,
    /// An utterance is playing
    Speaking,
    /// The current utterance is paused
    Paused,
}

pub struct SpeechOutputController {
    port: Box<dyn SynthesisPort>,
    state: OutputState,

    /// The owned current utterance; replaced on every `speak` so end events
    /// from a canceled utterance cannot flip the state machine.
    current: Option<UtteranceId>,
    next_utterance: UtteranceId,
}

impl SpeechOutputController {
    pub fn new(port: Box<dyn SynthesisPort>) -> Self {
        Self {
            port,
            state: OutputState::Idle,
            current: None,
            next_utterance: 0,
        }
    }

    pub fn state(&self) -> OutputState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != OutputState::Idle
    }

    /// Start speaking `text`, canceling any utterance already active
    ///
    /// The synthesis locale is fixed here from the language passed in; a
    /// later language change never retargets an utterance in flight.
    pub fn speak(&mut self, text: &str, language: Language) -> Result<UtteranceId> {
        if !self.port.available() {
            return Err(AssistantError::CapabilityUnavailable(
                "speech synthesis is not supported on this host".into(),
            ));
        }

        // Never two overlapping utterances
        self.port.cancel_all();
        self.current = None;
        self.state = OutputState::Idle;

        self.next_utterance += 1;
        let utterance = self.next_utterance;
        self.port
            .speak(utterance, text, language.synthesis_locale())?;

        self.current = Some(utterance);
        self.state = OutputState::Speaking;
        debug!(utterance, locale = language.synthesis_locale(), "speaking");
        Ok(utterance)
    }

    /// Pause playback; a no-op unless currently `Speaking`
    pub fn pause(&mut self) {
        if self.state != OutputState::Speaking {
            return;
        }
        // The engine's own playback state is authoritative
        if !self.port.is_speaking() || self.port.is_paused() {
            return;
        }
        self.port.pause();
        self.state = OutputState::Paused;
    }

    /// Resume playback; a no-op unless currently `Paused`
    pub fn resume(&mut self) {
        if self.state != OutputState::Paused {
            return;
        }
        self.port.resume();
        self.state = OutputState::Speaking;
    }

    /// Pause or resume based on what the engine reports right now
    pub fn toggle(&mut self) {
        if self.port.is_paused() {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Stop all playback; valid from any state, always ends `Idle`
    pub fn cancel(&mut self) {
        self.port.cancel_all();
        self.current = None;
        self.state = OutputState::Idle;
    }

    /// Apply an utterance-started event from the host
    pub fn on_started(&mut self, utterance: UtteranceId) {
        if self.current == Some(utterance) && self.state == OutputState::Idle {
            self.state = OutputState::Speaking;
        }
    }

    /// Apply an utterance-ended event from the host
    ///
    /// End events from canceled or superseded utterances are ignored.
    pub fn on_ended(&mut self, utterance: UtteranceId) {
        if self.current != Some(utterance) {
            debug!(utterance, "dropping end event from stale utterance");
            return;
        }
        self.current = None;
        self.state = OutputState::Idle;
    }
}
