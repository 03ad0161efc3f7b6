#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use chat_ui::interop::{dispatch_window_event, EventListener};
use chat_ui::storage::{persist_messages, remove_conversation, start_conversation, stored_messages};
use chat_ui::BrowserStorage;
use shared_types::{
    is_indexed, load_conversations, ConversationId, KeyValueStore, UiMessage,
    EVENT_LOCAL_STORAGE_CHANGE,
};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn fresh_id() -> ConversationId {
    ConversationId::generate()
}

#[wasm_bindgen_test]
fn browser_storage_round_trips_values() {
    let store = BrowserStorage::local().unwrap();
    store.set("chat-ui-test-key", "value").unwrap();
    assert_eq!(store.get("chat-ui-test-key").as_deref(), Some("value"));
    store.remove("chat-ui-test-key").unwrap();
    assert_eq!(store.get("chat-ui-test-key"), None);
}

#[wasm_bindgen_test]
fn starting_a_conversation_indexes_it_once() {
    let id = fresh_id();
    start_conversation(&id, "first question").unwrap();
    start_conversation(&id, "second question").unwrap();

    let store = BrowserStorage::local().unwrap();
    let matching: Vec<_> = load_conversations(&store)
        .into_iter()
        .filter(|entry| entry.id == id)
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].first_message, "first question");

    remove_conversation(&id).unwrap();
}

#[wasm_bindgen_test]
fn messages_of_deleted_conversations_are_not_written_back() {
    let id = fresh_id();
    start_conversation(&id, "hello").unwrap();
    let messages = vec![UiMessage::user_text("hello")];
    persist_messages(&id, &messages);
    assert_eq!(stored_messages(&id).map(|m| m.len()), Some(1));

    remove_conversation(&id).unwrap();
    persist_messages(&id, &messages);

    let store = BrowserStorage::local().unwrap();
    assert!(!is_indexed(&store, &id));
    assert_eq!(stored_messages(&id), None);
}

#[wasm_bindgen_test]
fn window_listener_fires_until_dropped() {
    let hits = Rc::new(Cell::new(0));
    let counter = hits.clone();
    let listener = EventListener::window(EVENT_LOCAL_STORAGE_CHANGE, move |_| {
        counter.set(counter.get() + 1);
    })
    .unwrap();

    dispatch_window_event(EVENT_LOCAL_STORAGE_CHANGE);
    assert_eq!(hits.get(), 1);

    drop(listener);
    dispatch_window_event(EVENT_LOCAL_STORAGE_CHANGE);
    assert_eq!(hits.get(), 1);
}
