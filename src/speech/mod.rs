//! Voice input/output coordination
//!
//! This module provides:
//! - Platform port contracts for the host's recognition/synthesis engines
//! - A speech input controller wrapping one recognition session at a time
//! - A speech output controller enforcing at most one active utterance

pub mod input;
pub mod output;
pub mod ports;

// Re-export commonly used types
pub use input::{InputState, SpeechInputController};
pub use output::{OutputState, SpeechOutputController};
pub use ports::{
    NullRecognition, NullSynthesis, RecognitionPort, SessionId, SynthesisPort, UtteranceId,
};
