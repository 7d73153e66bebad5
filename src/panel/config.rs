//! Configuration for one assistant panel

use crate::language::Language;
use crate::{AssistantError, Result};

/// Default advisory backend endpoint
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/ask";

/// Greeting the conversation is seeded with
pub const DEFAULT_GREETING: &str = "Hi! How can I help you today?";

#[derive(Clone, Debug)]
pub struct PanelConfig {
    /// URL of the backend `/ask` endpoint
    pub endpoint: String,

    /// Assistant greeting seeded into a fresh conversation
    pub greeting: String,

    /// Language the panel starts in
    pub default_language: Language,

    /// Whether replies are spoken aloud automatically
    pub auto_speak: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            greeting: DEFAULT_GREETING.to_string(),
            default_language: Language::default(),
            auto_speak: true,
        }
    }
}

impl PanelConfig {
    /// Set the backend endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the seeded greeting
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    /// Set the starting language
    pub fn with_language(mut self, language: Language) -> Self {
        self.default_language = language;
        self
    }

    /// Disable spoken playback of replies (display-only mode)
    pub fn without_auto_speak(mut self) -> Self {
        self.auto_speak = false;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.is_empty() {
            return Err(AssistantError::ConfigError(
                "backend endpoint is required".into(),
            ));
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(AssistantError::ConfigError(format!(
                "backend endpoint must be an http(s) URL: {}",
                self.endpoint
            )));
        }
        Ok(())
    }
}
