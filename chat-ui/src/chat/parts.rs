use dioxus::prelude::*;
use shared_types::{
    FilePart, MessagePart, PartState, Role, SourceDocumentPart, ToolPart, ToolState, UiMessage,
};

use crate::markdown::render_markdown;
use crate::tool_icons::tool_icon;

#[component]
pub fn MessageView(
    message: UiMessage,
    is_last: bool,
    busy: bool,
    on_regenerate: EventHandler<String>,
    on_copy: EventHandler<String>,
) -> Element {
    let is_user = message.role == Role::User;
    let sources = message.source_urls().len();
    let show_actions = !is_user && is_last && !busy;
    let regenerate_id = message.id.clone();
    let copy_text = message.text();

    rsx! {
        div {
            class: if is_user { "message-row user-row" } else { "message-row assistant-row" },
            div {
                class: "message-content",
                if !is_user && sources > 0 {
                    SourcesSummary { message: message.clone() }
                }
                for (index, part) in message.parts.iter().enumerate() {
                    PartView {
                        key: "{message.id}-{index}",
                        part: part.clone(),
                        is_user,
                        streaming: busy && is_last,
                    }
                }
                if show_actions {
                    div {
                        class: "message-actions",
                        button {
                            class: "icon-button",
                            title: "Retry",
                            onclick: move |_| on_regenerate.call(regenerate_id.clone()),
                            "↻"
                        }
                        button {
                            class: "icon-button",
                            title: "Copy",
                            onclick: move |_| on_copy.call(copy_text.clone()),
                            "⧉"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn SourcesSummary(message: UiMessage) -> Element {
    let sources = message.source_urls();
    let count = sources.len();
    let noun = if count == 1 { "source" } else { "sources" };

    rsx! {
        details {
            class: "sources",
            summary { "Used {count} {noun}" }
            ul {
                for source in sources {
                    li {
                        key: "{source.source_id}",
                        a {
                            href: "{source.url}",
                            target: "_blank",
                            rel: "noopener noreferrer",
                            title: "{source.url}",
                            {source.title.clone().unwrap_or_else(|| source.url.clone())}
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn PartView(part: MessagePart, is_user: bool, streaming: bool) -> Element {
    match part {
        MessagePart::Text(text) if is_user => rsx! {
            div { class: "message-bubble user-bubble", "{text.text}" }
        },
        MessagePart::Text(text) => {
            let html = render_markdown(&text.text);
            rsx! {
                div {
                    class: "message-bubble assistant-bubble markdown-body",
                    dangerous_inner_html: "{html}",
                }
            }
        }
        MessagePart::Reasoning(reasoning) => {
            let thinking = streaming && reasoning.state != Some(PartState::Done);
            rsx! {
                details {
                    class: "reasoning",
                    open: thinking,
                    summary { if thinking { "Thinking…" } else { "Reasoning" } }
                    div { class: "reasoning-text", "{reasoning.text}" }
                }
            }
        }
        MessagePart::Tool(tool) => rsx! { ToolCallView { tool } },
        MessagePart::File(file) => rsx! { FileView { file } },
        MessagePart::SourceDocument(document) => rsx! { DocumentView { document } },
        // Sources are summarized above the message; the rest has no visual
        MessagePart::SourceUrl(_) | MessagePart::StepStart | MessagePart::Other(_) => rsx! {},
    }
}

fn tool_state_class(state: ToolState) -> &'static str {
    match state {
        ToolState::InputStreaming => "tool-state pending",
        ToolState::InputAvailable => "tool-state running",
        ToolState::OutputAvailable => "tool-state completed",
        ToolState::OutputError => "tool-state failed",
    }
}

fn pretty_json(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

#[component]
fn ToolCallView(tool: ToolPart) -> Element {
    let input = tool.input.as_ref().map(pretty_json);
    let output = tool.output.as_ref().map(pretty_json);

    rsx! {
        details {
            class: "tool-call",
            open: tool.state == ToolState::OutputError,
            summary {
                span { class: "tool-icon", "{tool_icon(&tool.tool_name)}" }
                span { class: "tool-name", "{tool.tool_name}" }
                span { class: tool_state_class(tool.state), "{tool.state.label()}" }
            }
            if let Some(input) = input {
                div {
                    class: "tool-section",
                    h4 { "Parameters" }
                    pre { "{input}" }
                }
            }
            if let Some(error_text) = tool.error_text.clone() {
                div {
                    class: "tool-section tool-error",
                    h4 { "Error" }
                    pre { "{error_text}" }
                }
            } else if let Some(output) = output {
                div {
                    class: "tool-section",
                    h4 { "Result" }
                    pre { "{output}" }
                }
            }
        }
    }
}

#[component]
fn FileView(file: FilePart) -> Element {
    let label = file.filename.clone().unwrap_or_else(|| file.media_type.clone());
    if file.is_image() {
        rsx! {
            img { class: "message-image", src: "{file.url}", alt: "{label}" }
        }
    } else {
        rsx! {
            a {
                class: "message-file",
                href: "{file.url}",
                target: "_blank",
                rel: "noopener noreferrer",
                "📎 {label}"
            }
        }
    }
}

#[component]
fn DocumentView(document: SourceDocumentPart) -> Element {
    rsx! {
        div {
            class: "message-document",
            title: "{document.media_type}",
            "📄 {document.title}"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_values_are_shown_verbatim() {
        assert_eq!(pretty_json(&json!("ls -la")), "ls -la");
    }

    #[test]
    fn structured_values_are_pretty_printed() {
        assert_eq!(pretty_json(&json!({"query": "rust"})), "{\n  \"query\": \"rust\"\n}");
    }

    #[test]
    fn every_tool_state_has_a_style() {
        for state in [
            ToolState::InputStreaming,
            ToolState::InputAvailable,
            ToolState::OutputAvailable,
            ToolState::OutputError,
        ] {
            assert!(tool_state_class(state).starts_with("tool-state "));
        }
    }
}
