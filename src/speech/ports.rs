//! Platform port contracts for the host speech engines
//!
//! The browser (or any other host) owns singleton recognition and synthesis
//! engines. The core only ever talks to these two traits, so a test double or
//! an alternative platform drops in without touching the controllers.
//!
//! Completions flow back through the controllers' `on_*` methods; the ids
//! passed here let a controller discard events from superseded sessions.

use crate::{AssistantError, Result};

/// Identifier of one voice-to-text capture attempt
pub type SessionId = u64;

/// Identifier of one text-to-speech playback instance
pub type UtteranceId = u64;

/// Host voice-recognition engine
pub trait RecognitionPort {
    /// Whether the host provides a recognition engine at all
    fn available(&self) -> bool;

    /// Begin capturing speech in the given locale
    fn start(&mut self, session: SessionId, locale: &str) -> Result<()>;

    /// Abort a session; completion events for it must no longer be applied
    fn abort(&mut self, session: SessionId);
}

/// Host voice-synthesis engine
pub trait SynthesisPort {
    /// Whether the host provides a synthesis engine at all
    fn available(&self) -> bool;

    /// Begin speaking `text` in the given locale
    fn speak(&mut self, utterance: UtteranceId, text: &str, locale: &str) -> Result<()>;

    fn pause(&mut self);

    fn resume(&mut self);

    /// Stop all playback immediately
    fn cancel_all(&mut self);

    /// Ground truth from the engine: is anything being spoken right now
    fn is_speaking(&self) -> bool;

    /// Ground truth from the engine: is playback currently paused
    fn is_paused(&self) -> bool;
}

/// Recognition port for hosts without a speech engine (text-only mode)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRecognition;

impl RecognitionPort for NullRecognition {
    fn available(&self) -> bool {
        false
    }

    fn start(&mut self, _session: SessionId, _locale: &str) -> Result<()> {
        Err(AssistantError::CapabilityUnavailable(
            "no recognition engine on this host".into(),
        ))
    }

    fn abort(&mut self, _session: SessionId) {}
}

/// Synthesis port for hosts without a speech engine (text-only mode)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSynthesis;

impl SynthesisPort for NullSynthesis {
    fn available(&self) -> bool {
        false
    }

    fn speak(&mut self, _utterance: UtteranceId, _text: &str, _locale: &str) -> Result<()> {
        Err(AssistantError::CapabilityUnavailable(
            "no synthesis engine on this host".into(),
        ))
    }

    fn pause(&mut self) {}

    fn resume(&mut self) {}

    fn cancel_all(&mut self) {}

    fn is_speaking(&self) -> bool {
        false
    }

    fn is_paused(&self) -> bool {
        false
    }
}
