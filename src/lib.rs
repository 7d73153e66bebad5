pub mod conversation;
pub mod dispatch;
pub mod language;
pub mod panel;
pub mod reply;
pub mod speech;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum AssistantError {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Speech capability unavailable: {0}")]
    CapabilityUnavailable(String),

    #[error("Recognition failed: {0}")]
    RecognitionFailed(String),

    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AssistantError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // A bad language name or config requires fixing the input
            AssistantError::UnsupportedLanguage(_) => false,
            AssistantError::ConfigError(_) => false,
            // The host simply lacks the engine; typed input still works
            AssistantError::CapabilityUnavailable(_) => false,
            // These are typically transient errors
            AssistantError::RecognitionFailed(_) => true,
            AssistantError::NetworkFailure(_) => true,
            AssistantError::ServerError(_) => true,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            AssistantError::UnsupportedLanguage(_) => {
                "That language is not supported.".to_string()
            }
            AssistantError::CapabilityUnavailable(_) => {
                "Voice features are not available here. You can still type your question."
                    .to_string()
            }
            AssistantError::RecognitionFailed(_) => {
                "Speech recognition failed. Please try again.".to_string()
            }
            AssistantError::NetworkFailure(_) => {
                "Could not reach the assistant. Please check your connection.".to_string()
            }
            AssistantError::ServerError(_) => {
                "The assistant had a problem answering. Please try again.".to_string()
            }
            AssistantError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AssistantError>;
