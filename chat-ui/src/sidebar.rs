use chrono::{Local, TimeZone};
use dioxus::prelude::*;
use shared_types::{is_plain_left_click, ConversationEntry, ConversationId};

use crate::hooks::{navigate, AppState};
use crate::storage;
use crate::theme::ModeToggle;

/// Follow an in-app link without a page load, unless the user asked for a
/// new tab or window
fn follow_locally(event: MouseEvent, target: &ConversationId) {
    let button = event
        .trigger_button()
        .map(|button| button.into_web_code())
        .unwrap_or(0);
    let modifiers = event.modifiers();
    if !is_plain_left_click(button, modifiers.meta(), modifiers.ctrl()) {
        return;
    }
    event.prevent_default();
    navigate(target);
}

/// Date and time the way the sidebar shows it, e.g. `3/14/2024, 9:26:53 AM`
pub fn format_timestamp<Tz>(timestamp_ms: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    tz.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|time| time.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string())
        .unwrap_or_default()
}

#[component]
pub fn AppSidebar() -> Element {
    let state = use_context::<AppState>();
    let mut collapsed = use_signal(|| false);
    let current = state.conversation_id.read().clone();
    let conversations = state.conversations.read().clone();

    rsx! {
        aside {
            class: if collapsed() { "sidebar collapsed" } else { "sidebar" },

            div {
                class: "sidebar-header",
                h1 { class: "sidebar-title", "AI Chat" }
                button {
                    class: "icon-button sidebar-trigger",
                    title: "Toggle sidebar",
                    onclick: move |_| collapsed.toggle(),
                    "☰"
                }
            }

            nav {
                class: "sidebar-content",
                a {
                    class: "sidebar-link new-conversation",
                    href: "/",
                    title: "Start a new conversation",
                    onclick: move |e| follow_locally(e, &ConversationId::root()),
                    span { class: "sidebar-icon", "⊕" }
                    span { class: "sidebar-label", "New conversation" }
                }

                ul {
                    class: "conversation-list",
                    for entry in conversations {
                        ConversationItem {
                            key: "{entry.id}",
                            active: entry.id == current,
                            entry: entry.clone(),
                        }
                    }
                }
            }

            div {
                class: "sidebar-footer",
                ModeToggle {}
            }
        }
    }
}

#[component]
fn ConversationItem(entry: ConversationEntry, active: bool) -> Element {
    let target = entry.id.clone();
    let deleted = entry.id.clone();
    let when = format_timestamp(entry.timestamp, &Local);

    let on_delete = move |e: MouseEvent| {
        e.prevent_default();
        e.stop_propagation();
        if let Err(err) = storage::remove_conversation(&deleted) {
            dioxus_logger::tracing::error!("Failed to delete {}: {}", deleted, err);
            return;
        }
        if active {
            navigate(&ConversationId::root());
        }
    };

    rsx! {
        li {
            class: if active { "conversation-item active" } else { "conversation-item" },
            a {
                class: "sidebar-link conversation-link",
                href: "{entry.id}",
                title: "{entry.first_message}",
                onclick: move |e| follow_locally(e, &target),
                span { class: "sidebar-icon", "💬" }
                span {
                    class: "conversation-text",
                    span { class: "conversation-preview", "{entry.first_message}" }
                    span { class: "conversation-time", "{when}" }
                }
            }
            button {
                class: "icon-button conversation-delete",
                title: "Delete conversation",
                onclick: on_delete,
                "✕"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn timestamps_use_month_day_year_and_twelve_hour_clock() {
        assert_eq!(format_timestamp(1_710_408_413_000, &Utc), "3/14/2024, 9:26:53 AM");
        assert_eq!(format_timestamp(1_700_000_000_000, &Utc), "11/14/2023, 10:13:20 PM");
    }

    #[test]
    fn epoch_renders() {
        assert_eq!(format_timestamp(0, &Utc), "1/1/1970, 12:00:00 AM");
    }
}
