//! Push-channel event schema and the pure fold of events into conversations.

mod error;
mod fold;
mod traits;
mod types;

pub use error::{RealtimeError, Result};
pub use fold::{apply_to_conversation, dedup_key};
pub use traits::RealtimeChannel;
pub use types::{ConversationEvent, RealtimeEvent, RealtimeEventType};
