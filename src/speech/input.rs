//! Speech input controller
//!
//! Wraps the host recognition engine behind a two-state machine. At most one
//! capture session exists at a time; starting a new one aborts the previous
//! session rather than ignoring it, and every completion path (result, error,
//! abort) returns the controller to `Idle`.

use crate::language::Language;
use crate::speech::ports::{RecognitionPort, SessionId};
use crate::{AssistantError, Result};
use tracing::{debug, warn};

/// Recognition state for voice input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    /// No capture session active
    Idle,
    /// A capture session is running
    Listening,
}

pub struct SpeechInputController {
    port: Box<dyn RecognitionPort>,
    state: InputState,

    /// The owned current session; replaced (with abort of the old one) on
    /// every restart so callbacks from a superseded session cannot land here.
    current: Option<SessionId>,
    next_session: SessionId,
}

impl SpeechInputController {
    pub fn new(port: Box<dyn RecognitionPort>) -> Self {
        Self {
            port,
            state: InputState::Idle,
            current: None,
            next_session: 0,
        }
    }

    pub fn state(&self) -> InputState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == InputState::Listening
    }

    /// Begin a capture session in the given language
    ///
    /// Fails fast with `CapabilityUnavailable` when the host has no
    /// recognition engine. The locale is fixed here, at call time; a later
    /// language change does not affect a session already running.
    pub fn start_listening(&mut self, language: Language) -> Result<SessionId> {
        if !self.port.available() {
            return Err(AssistantError::CapabilityUnavailable(
                "speech recognition is not supported on this host".into(),
            ));
        }

        if let Some(old) = self.current.take() {
            debug!(session = old, "aborting superseded recognition session");
            self.port.abort(old);
        }
        self.state = InputState::Idle;

        self.next_session += 1;
        let session = self.next_session;
        self.port.start(session, language.recognition_locale())?;

        self.current = Some(session);
        self.state = InputState::Listening;
        debug!(session, locale = language.recognition_locale(), "listening");
        Ok(session)
    }

    /// Apply a recognition result from the host
    ///
    /// Returns the transcript when the session is still current, `None` for
    /// a superseded session. Always ends with the controller in `Idle` when
    /// the event was current.
    pub fn on_result(&mut self, session: SessionId, transcript: String) -> Option<String> {
        if self.current != Some(session) {
            debug!(session, "dropping result from superseded session");
            return None;
        }
        self.current = None;
        self.state = InputState::Idle;
        Some(transcript)
    }

    /// Apply a recognition error from the host
    ///
    /// Returns the surfaced error when the session is still current; the
    /// conversation history is untouched and the user may simply retry.
    pub fn on_error(&mut self, session: SessionId, reason: &str) -> Option<AssistantError> {
        if self.current != Some(session) {
            debug!(session, "dropping error from superseded session");
            return None;
        }
        self.current = None;
        self.state = InputState::Idle;
        warn!(session, reason, "recognition failed");
        Some(AssistantError::RecognitionFailed(reason.to_string()))
    }

    /// Abort any active session, e.g. when the panel closes
    pub fn abort(&mut self) {
        if let Some(session) = self.current.take() {
            self.port.abort(session);
        }
        self.state = InputState::Idle;
    }
}
