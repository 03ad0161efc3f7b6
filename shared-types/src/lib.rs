//! Shared types for the chat client
//!
//! Everything in this crate is platform independent so that the
//! conversation/history bookkeeping can be unit tested natively:
//! - UI messages and their parts (the format persisted in local storage)
//! - Decoding of the `/api/chat` UI message stream
//! - The conversation index kept under `conversationIds`
//! - URL-path based conversation routing
//! - Ownership of the in-memory messages and the active response stream
//!
//! The Dioxus client (`chat-ui`) wires these to `window.localStorage`,
//! `window.history` and `fetch`.

pub mod config;
pub mod conversation;
pub mod message;
pub mod routing;
pub mod session;
pub mod store;
pub mod stream;
pub mod throttle;

pub use config::*;
pub use conversation::*;
pub use message::*;
pub use routing::*;
pub use session::*;
pub use store::*;
pub use stream::*;
pub use throttle::*;

// ============================================================================
// Constants
// ============================================================================

/// Storage key of the conversation index
pub const CONVERSATION_INDEX_KEY: &str = "conversationIds";

/// Previews longer than this many characters are cut and suffixed with `...`
pub const MAX_FIRST_MESSAGE_LENGTH: usize = 30;

/// Minimum spacing between two writes of the same message list
pub const PERSIST_THROTTLE_MS: f64 = 500.0;
