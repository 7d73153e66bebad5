//! Append-only conversation history
//!
//! Owns the authoritative message sequence for one assistant panel. The store
//! is seeded with a greeting, grows only by atomic batch appends, and can be
//! reset back to the greeting; it is never reordered or edited in place.

use super::types::Message;
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// Notification emitted to store subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// A batch of messages was appended
    Appended { count: usize },

    /// The conversation was reset to the seeded greeting
    Reset,
}

#[derive(Debug)]
struct Inner {
    greeting: String,
    messages: Vec<Message>,
    subscribers: Vec<Sender<StoreEvent>>,
}

/// Ordered, append-only message history shared between the panel and its host
#[derive(Debug, Clone)]
pub struct ConversationStore {
    inner: Arc<RwLock<Inner>>,
}

impl ConversationStore {
    /// Create a store seeded with the given assistant greeting
    pub fn new(greeting: impl Into<String>) -> Self {
        let greeting = greeting.into();
        let seeded = vec![Message::assistant(greeting.clone())];
        Self {
            inner: Arc::new(RwLock::new(Inner {
                greeting,
                messages: seeded,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Append a batch of messages atomically, preserving batch order
    ///
    /// An empty batch is a no-op and emits no notification.
    pub fn append(&self, batch: Vec<Message>) {
        if batch.is_empty() {
            return;
        }
        let count = batch.len();
        let mut inner = self.inner.write();
        inner.messages.extend(batch);
        debug!(count, total = inner.messages.len(), "messages appended");
        notify(&mut inner, StoreEvent::Appended { count });
    }

    /// Clear the history back to the single seeded greeting
    pub fn reset(&self) {
        let mut inner = self.inner.write();
        inner.messages.clear();
        let greeting = Message::assistant(inner.greeting.clone());
        inner.messages.push(greeting);
        debug!("conversation reset");
        notify(&mut inner, StoreEvent::Reset);
    }

    /// Read-only ordered view of the full history
    pub fn snapshot(&self) -> Vec<Message> {
        self.inner.read().messages.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().messages.len()
    }

    /// Always false for a live store: the greeting is reseeded on reset, so
    /// the history never drops below one message
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subscribe to store notifications (e.g. for scroll-to-bottom)
    pub fn subscribe(&self) -> Receiver<StoreEvent> {
        let (tx, rx) = unbounded();
        self.inner.write().subscribers.push(tx);
        rx
    }
}

/// Fan out an event, pruning subscribers whose receiver was dropped
fn notify(inner: &mut Inner, event: StoreEvent) {
    inner.subscribers.retain(|tx| tx.send(event).is_ok());
}
