//! Supported assistant languages and their speech locale codes
//!
//! Maps each language the advisory backend understands to the locale code
//! used for both speech recognition and synthesis.

use crate::AssistantError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A language the assistant can listen, speak and answer in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    Hindi,
    Telugu,
    Tamil,
    Kannada,
    Bengali,
}

impl Language {
    /// All supported languages, in menu order
    pub const ALL: [Language; 6] = [
        Language::English,
        Language::Hindi,
        Language::Telugu,
        Language::Tamil,
        Language::Kannada,
        Language::Bengali,
    ];

    /// The language name as sent to the backend
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Telugu => "Telugu",
            Language::Tamil => "Tamil",
            Language::Kannada => "Kannada",
            Language::Bengali => "Bengali",
        }
    }

    /// Locale code for speech recognition
    pub fn recognition_locale(&self) -> &'static str {
        self.locale()
    }

    /// Locale code for speech synthesis
    ///
    /// Identical to the recognition locale in this system; kept as a separate
    /// accessor so the two concerns stay independent at the call sites.
    pub fn synthesis_locale(&self) -> &'static str {
        self.locale()
    }

    fn locale(&self) -> &'static str {
        match self {
            Language::English => "en-US",
            Language::Hindi => "hi-IN",
            Language::Telugu => "te-IN",
            Language::Tamil => "ta-IN",
            Language::Kannada => "kn-IN",
            Language::Bengali => "bn-IN",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::English
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = AssistantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .iter()
            .copied()
            .find(|lang| lang.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AssistantError::UnsupportedLanguage(s.to_string()))
    }
}
