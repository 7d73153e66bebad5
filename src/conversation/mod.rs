pub mod store;
pub mod types;

pub use store::{ConversationStore, StoreEvent};
pub use types::{Message, Role};
