//! `window.localStorage` adapter and the conversation bookkeeping built on it

use shared_types::{
    delete_conversation, is_indexed, load_conversations, load_messages, record_conversation,
    save_messages, ConversationEntry, ConversationId, KeyValueStore, StoreError, UiMessage,
    EVENT_LOCAL_STORAGE_CHANGE,
};

use crate::interop::{dispatch_window_event, js_error_message};

/// [`KeyValueStore`] backed by the page's local storage
pub struct BrowserStorage {
    storage: web_sys::Storage,
}

impl BrowserStorage {
    pub fn local() -> Result<Self, StoreError> {
        web_sys::window()
            .and_then(|window| window.local_storage().ok().flatten())
            .map(|storage| Self { storage })
            .ok_or(StoreError::Unavailable)
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StoreError::Write {
                key: key.to_string(),
                reason: js_error_message(&e),
            })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.storage
            .remove_item(key)
            .map_err(|e| StoreError::Write {
                key: key.to_string(),
                reason: js_error_message(&e),
            })
    }
}

/// Tell same-tab listeners that the conversation index changed.
///
/// The browser only fires `storage` in other tabs.
pub fn notify_local_storage_change() {
    dispatch_window_event(EVENT_LOCAL_STORAGE_CHANGE);
}

pub fn conversations() -> Vec<ConversationEntry> {
    match BrowserStorage::local() {
        Ok(store) => load_conversations(&store),
        Err(e) => {
            dioxus_logger::tracing::warn!("Conversation list unavailable: {}", e);
            Vec::new()
        }
    }
}

/// Add `id` to the index unless it is already there
pub fn start_conversation(id: &ConversationId, first_message: &str) -> Result<(), StoreError> {
    let store = BrowserStorage::local()?;
    if is_indexed(&store, id) {
        return Ok(());
    }
    let now_ms = chrono::Utc::now().timestamp_millis();
    record_conversation(&store, id, first_message, now_ms)?;
    notify_local_storage_change();
    Ok(())
}

pub fn remove_conversation(id: &ConversationId) -> Result<(), StoreError> {
    let store = BrowserStorage::local()?;
    delete_conversation(&store, id)?;
    notify_local_storage_change();
    Ok(())
}

pub fn stored_messages(id: &ConversationId) -> Option<Vec<UiMessage>> {
    let store = BrowserStorage::local().ok()?;
    load_messages(&store, id)
}

/// Write the message list of an indexed conversation.
///
/// Conversations missing from the index (deleted meanwhile) are skipped.
pub fn persist_messages(id: &ConversationId, messages: &[UiMessage]) {
    let store = match BrowserStorage::local() {
        Ok(store) => store,
        Err(e) => {
            dioxus_logger::tracing::warn!("Cannot persist {}: {}", id, e);
            return;
        }
    };
    if !is_indexed(&store, id) {
        return;
    }
    if let Err(e) = save_messages(&store, id, messages) {
        dioxus_logger::tracing::error!("Failed to persist messages: {}", e);
    }
}
