//! Hooks that keep signals in sync with the address bar and local storage
//!
//! Components never talk to each other directly. Writers update history or
//! storage and fire a window event; every interested component listens.

use std::rc::Rc;

use dioxus::prelude::*;
use shared_types::{
    index_from_storage_event, ConversationEntry, ConversationId,
    EVENT_HISTORY_STATE_CHANGED, EVENT_LOCAL_STORAGE_CHANGE, EVENT_POPSTATE, EVENT_STORAGE,
};
use wasm_bindgen::JsCast;
use web_sys::{Event, StorageEvent};

use crate::interop::{current_path, push_path, EventListener};
use crate::storage;

/// Signals shared through context by the app shell
#[derive(Clone, Copy)]
pub struct AppState {
    pub conversation_id: Signal<ConversationId>,
    pub conversations: Signal<Vec<ConversationEntry>>,
}

/// The conversation id in the address bar
pub fn use_conversation_id() -> Signal<ConversationId> {
    let mut conversation_id = use_signal(|| ConversationId::from_path(&current_path()));

    use_hook(move || {
        let sync = move |_: Event| {
            let next = ConversationId::from_path(&current_path());
            if *conversation_id.peek() != next {
                dioxus_logger::tracing::debug!("Conversation changed to {}", next);
                conversation_id.set(next);
            }
        };
        Rc::new([
            EventListener::window(EVENT_POPSTATE, sync),
            EventListener::window(EVENT_HISTORY_STATE_CHANGED, sync),
        ])
    });

    conversation_id
}

/// Switch to `id` without reloading the page
pub fn navigate(id: &ConversationId) {
    if ConversationId::from_path(&current_path()) == *id {
        return;
    }
    push_path(id.as_str());
}

/// The conversation index, newest first
pub fn use_conversations() -> Signal<Vec<ConversationEntry>> {
    let mut conversations = use_signal(storage::conversations);

    use_hook(move || {
        let same_tab = EventListener::window(EVENT_LOCAL_STORAGE_CHANGE, move |_: Event| {
            conversations.set(storage::conversations());
        });
        let other_tabs = EventListener::window(EVENT_STORAGE, move |event: Event| {
            let Some(event) = event.dyn_ref::<StorageEvent>() else {
                return;
            };
            let key = event.key();
            let new_value = event.new_value();
            if let Some(entries) = index_from_storage_event(key.as_deref(), new_value.as_deref()) {
                conversations.set(entries);
            }
        });
        Rc::new([same_tab, other_tabs])
    });

    conversations
}
