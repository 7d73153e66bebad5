//! Request dispatcher for the advisory backend
//!
//! Sends one user message plus the selected language to the `/ask` endpoint
//! and hands the raw reply text back to the caller. Every dispatch carries a
//! monotonically increasing sequence number assigned synchronously at call
//! time; comparing it against the latest issued number is how the caller
//! discards stale responses. The dispatcher itself never queues.

use crate::language::Language;
use crate::{AssistantError, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};
use tracing::debug;

#[derive(Debug, Serialize)]
struct AskRequest {
    message: String,
    language: Language,
}

#[derive(Debug, Deserialize)]
struct AskResponse {
    reply: String,
}

/// One in-flight request: its sequence number plus the reply future
pub struct PendingReply {
    seq: u64,
    future: Pin<Box<dyn Future<Output = Result<String>> + Send>>,
}

impl PendingReply {
    /// Sequence number assigned when this request was dispatched
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

impl Future for PendingReply {
    type Output = Result<String>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut().future.as_mut().poll(cx)
    }
}

pub struct RequestDispatcher {
    client: reqwest::Client,
    endpoint: String,
    next_seq: AtomicU64,
}

impl RequestDispatcher {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Dispatch one message to the backend
    ///
    /// The sequence number is assigned before this method returns, so a later
    /// `send` is always numbered higher than an earlier one even when both
    /// replies are still pending. Transport failures map to `NetworkFailure`,
    /// non-2xx statuses and undecodable bodies to `ServerError`; nothing
    /// panics past this boundary.
    pub fn send(&self, message: &str, language: Language) -> PendingReply {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let body = AskRequest {
            message: message.to_string(),
            language,
        };

        let future = Box::pin(async move {
            debug!(seq, %language, "dispatching message to backend");
            let response = client
                .post(&endpoint)
                .json(&body)
                .send()
                .await
                .map_err(|e| AssistantError::NetworkFailure(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(AssistantError::ServerError(format!(
                    "backend returned {}",
                    status
                )));
            }

            let parsed: AskResponse = response
                .json()
                .await
                .map_err(|e| AssistantError::ServerError(format!("malformed reply body: {}", e)))?;

            debug!(seq, "reply received");
            Ok(parsed.reply)
        });

        PendingReply { seq, future }
    }
}
