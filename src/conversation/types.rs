use crate::reply::Segment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who a message is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Assistant,
}

/// One entry in the conversation, immutable once created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub origin: Role,
    pub text: String,
    pub emphasis: bool,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(origin: Role, text: impl Into<String>, emphasis: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin,
            text: text.into(),
            emphasis,
            timestamp: Utc::now(),
        }
    }

    /// A plain message typed or spoken by the user
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text, false)
    }

    /// A plain message from the assistant
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text, false)
    }

    /// An assistant message built from one formatted reply segment
    pub fn from_segment(segment: &Segment) -> Self {
        Self::new(Role::Assistant, segment.text.clone(), segment.emphasis)
    }
}
