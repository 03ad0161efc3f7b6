//! The conversation pane: message thread plus prompt input

pub mod parts;
pub mod prompt;
pub mod session;

use dioxus::prelude::*;
use shared_types::{ChatStatus, ConversationId, RemoteConfig};

use crate::api::fetch_remote_config;
use crate::hooks::{navigate, AppState};
use crate::interop::{copy_to_clipboard, focus_element, is_scrolled_to_bottom, scroll_to_bottom};
use parts::MessageView;
use prompt::{PromptInput, PROMPT_INPUT_ID};
use session::{use_chat_session, RequestOptions};

pub use session::ChatSession;

const MESSAGES_SCROLL_ID: &str = "messages-scroll-area";

#[component]
pub fn ChatView() -> Element {
    let state = use_context::<AppState>();
    let conversation_id = state.conversation_id;
    let mut session = use_chat_session();
    let mut input = use_signal(String::new);
    let mut remote_config = use_signal(|| None::<RemoteConfig>);
    let mut model = use_signal(String::new);
    let enabled_tools = use_signal(Vec::<String>::new);
    let mut at_bottom = use_signal(|| true);

    // Load model and tool configuration once
    use_effect(move || {
        spawn(async move {
            match fetch_remote_config().await {
                Ok(config) => {
                    if let Some(default_model) = config.default_model() {
                        model.set(default_model.id.clone());
                    }
                    remote_config.set(Some(config));
                }
                Err(e) => {
                    dioxus_logger::tracing::error!("Failed to fetch model configuration: {}", e);
                }
            }
        });
    });

    // Follow the address bar
    use_effect(move || {
        let id = conversation_id();
        session.open(&id);
        focus_element(PROMPT_INPUT_ID);
    });

    // Persist and keep the thread pinned to the bottom while it grows
    use_effect(move || {
        let _ = session.messages.read().len();
        session.schedule_persist();
        if *at_bottom.peek() {
            scroll_to_bottom(MESSAGES_SCROLL_ID);
        }
    });

    let request_options = move || {
        let selected = model.peek().clone();
        let builtin_tools = remote_config
            .peek()
            .as_ref()
            .map(|config| config.effective_tools(&selected, &enabled_tools.peek()))
            .unwrap_or_default();
        RequestOptions {
            model: selected,
            builtin_tools,
        }
    };

    let on_submit = move |_: ()| {
        let text = input.peek().clone();
        let current = conversation_id.peek().clone();
        if session.submit(&text, &current, request_options()) {
            input.set(String::new());
            at_bottom.set(true);
        }
    };

    let on_regenerate = move |message_id: String| {
        session.regenerate(&message_id, request_options());
    };

    let on_copy = move |text: String| {
        spawn(async move {
            if let Err(e) = copy_to_clipboard(&text).await {
                dioxus_logger::tracing::warn!("Copy to clipboard failed: {}", e);
            }
        });
    };

    let id = conversation_id();
    let messages = session.messages.read().clone();
    let status = *session.status.read();
    let busy = status.is_busy();

    let not_found = *session.not_found.read();

    // Stored messages are still loading
    if !id.is_root() && messages.is_empty() && !not_found {
        return rsx! {};
    }

    let config = remote_config.read().clone().unwrap_or_default();
    let tools = config.available_tools(&model.read());
    let last_index = messages.len().saturating_sub(1);

    rsx! {
        div {
            class: "chat-container",
            div {
                id: MESSAGES_SCROLL_ID,
                class: "messages-scroll-area",
                onscroll: move |_| at_bottom.set(is_scrolled_to_bottom(MESSAGES_SCROLL_ID)),
                div {
                    class: "messages-list",
                    if not_found && messages.is_empty() {
                        div {
                            class: "chat-missing",
                            p { "This conversation could not be found in this browser." }
                            a {
                                href: "/",
                                onclick: move |e: MouseEvent| {
                                    e.prevent_default();
                                    navigate(&ConversationId::root());
                                },
                                "Start a new conversation"
                            }
                        }
                    } else if messages.is_empty() {
                        div {
                            class: "empty-state",
                            div { class: "empty-icon", "💬" }
                            p { "Start a conversation" }
                            span { "Ask anything below to begin" }
                        }
                    }
                    for (index, message) in messages.iter().enumerate() {
                        MessageView {
                            key: "{message.id}",
                            message: message.clone(),
                            is_last: index == last_index,
                            busy,
                            on_regenerate,
                            on_copy,
                        }
                    }
                    if status == ChatStatus::Submitted {
                        LoadingIndicator {}
                    }
                    if status == ChatStatus::Error {
                        div {
                            class: "error-banner",
                            strong { "Error: " }
                            {session.error.read().clone().unwrap_or_default()}
                        }
                    }
                }
            }

            if !at_bottom() {
                button {
                    class: "icon-button scroll-button",
                    title: "Scroll to bottom",
                    onclick: move |_| {
                        scroll_to_bottom(MESSAGES_SCROLL_ID);
                        at_bottom.set(true);
                    },
                    "↓"
                }
            }

            PromptInput {
                value: input,
                busy,
                models: config.models.clone(),
                selected_model: model,
                tools,
                enabled_tools,
                on_submit,
                on_stop: move |_: ()| session.stop(),
            }
        }
    }
}

#[component]
pub fn LoadingIndicator() -> Element {
    rsx! {
        div {
            class: "message-row assistant-row",
            div {
                class: "typing-indicator",
                span {}
                span {}
                span {}
            }
        }
    }
}
