//! Conversation index and per-conversation message records
//!
//! Layout in local storage:
//! - `conversationIds` → JSON array of [`ConversationEntry`], newest first
//! - `<conversation path>` → JSON array of [`UiMessage`]
//!
//! Both are client caches. Corrupt records are logged and treated as absent.

use serde::{Deserialize, Serialize};

use crate::message::UiMessage;
use crate::routing::ConversationId;
use crate::store::{KeyValueStore, StoreError};
use crate::{CONVERSATION_INDEX_KEY, MAX_FIRST_MESSAGE_LENGTH};

/// Sidebar entry for a stored conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConversationEntry {
    pub id: ConversationId,
    pub first_message: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

/// Shorten the first message for the sidebar
pub fn truncate_preview(text: &str) -> String {
    if text.chars().count() > MAX_FIRST_MESSAGE_LENGTH {
        let cut: String = text.chars().take(MAX_FIRST_MESSAGE_LENGTH).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

/// Read the conversation index; missing or unreadable data yields an empty list
pub fn load_conversations<S>(store: &S) -> Vec<ConversationEntry>
where
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(CONVERSATION_INDEX_KEY) else {
        return Vec::new();
    };
    parse_conversations(&raw)
}

/// Parse a serialized index, e.g. the `newValue` of a cross-tab storage event
pub fn parse_conversations(raw: &str) -> Vec<ConversationEntry> {
    match serde_json::from_str::<Vec<ConversationEntry>>(raw) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Ignoring unreadable conversation index: {}", e);
            Vec::new()
        }
    }
}

/// The index implied by a cross-tab `storage` event, `None` when the event
/// is about another key.
///
/// A missing key means the other tab cleared storage; a missing value means
/// the index itself was removed. Both leave no conversations.
pub fn index_from_storage_event(
    key: Option<&str>,
    new_value: Option<&str>,
) -> Option<Vec<ConversationEntry>> {
    match key {
        Some(CONVERSATION_INDEX_KEY) => Some(new_value.map(parse_conversations).unwrap_or_default()),
        Some(_) => None,
        None => Some(Vec::new()),
    }
}

/// Whether `id` has an entry in the conversation index
pub fn is_indexed<S>(store: &S, id: &ConversationId) -> bool
where
    S: KeyValueStore + ?Sized,
{
    load_conversations(store).iter().any(|entry| &entry.id == id)
}

/// Add a new conversation at the front of the index
pub fn record_conversation<S>(
    store: &S,
    id: &ConversationId,
    first_message: &str,
    now_ms: i64,
) -> Result<Vec<ConversationEntry>, StoreError>
where
    S: KeyValueStore + ?Sized,
{
    let mut entries = load_conversations(store);
    entries.insert(
        0,
        ConversationEntry {
            id: id.clone(),
            first_message: truncate_preview(first_message),
            timestamp: now_ms,
        },
    );
    write_conversations(store, &entries)?;
    Ok(entries)
}

/// Remove a conversation from the index together with its messages
pub fn delete_conversation<S>(
    store: &S,
    id: &ConversationId,
) -> Result<Vec<ConversationEntry>, StoreError>
where
    S: KeyValueStore + ?Sized,
{
    let mut entries = load_conversations(store);
    entries.retain(|entry| &entry.id != id);
    write_conversations(store, &entries)?;
    store.remove(id.as_str())?;
    Ok(entries)
}

fn write_conversations<S>(store: &S, entries: &[ConversationEntry]) -> Result<(), StoreError>
where
    S: KeyValueStore + ?Sized,
{
    let payload = serde_json::to_string(entries).map_err(|e| StoreError::Serialize {
        key: CONVERSATION_INDEX_KEY.to_string(),
        reason: e.to_string(),
    })?;
    store.set(CONVERSATION_INDEX_KEY, &payload)
}

/// Stored messages of a conversation, `None` when nothing usable is stored
pub fn load_messages<S>(store: &S, id: &ConversationId) -> Option<Vec<UiMessage>>
where
    S: KeyValueStore + ?Sized,
{
    if id.is_root() {
        return None;
    }
    let raw = store.get(id.as_str())?;
    match serde_json::from_str::<Vec<UiMessage>>(&raw) {
        Ok(messages) => Some(messages),
        Err(e) => {
            tracing::warn!("Ignoring unreadable messages for {}: {}", id, e);
            None
        }
    }
}

/// Write the message list of a conversation.
///
/// The root path and empty lists are never written. Returns whether a write
/// happened.
pub fn save_messages<S>(
    store: &S,
    id: &ConversationId,
    messages: &[UiMessage],
) -> Result<bool, StoreError>
where
    S: KeyValueStore + ?Sized,
{
    if id.is_root() || messages.is_empty() {
        return Ok(false);
    }
    let payload = serde_json::to_string(messages).map_err(|e| StoreError::Serialize {
        key: id.to_string(),
        reason: e.to_string(),
    })?;
    store.set(id.as_str(), &payload)?;
    Ok(true)
}
