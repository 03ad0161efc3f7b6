use dioxus::prelude::*;
use shared_types::{BuiltinTool, ModelConfig};

use crate::tool_icons::tool_icon;

pub const PROMPT_INPUT_ID: &str = "prompt-input";

/// Flip `tool_id` in the enabled list
pub fn toggle_tool(enabled: &mut Vec<String>, tool_id: &str) {
    if let Some(position) = enabled.iter().position(|id| id == tool_id) {
        enabled.remove(position);
    } else {
        enabled.push(tool_id.to_string());
    }
}

#[component]
pub fn PromptInput(
    value: Signal<String>,
    busy: bool,
    models: Vec<ModelConfig>,
    selected_model: Signal<String>,
    tools: Vec<BuiltinTool>,
    enabled_tools: Signal<Vec<String>>,
    on_submit: EventHandler<()>,
    on_stop: EventHandler<()>,
) -> Element {
    let mut value = value;
    let mut selected_model = selected_model;
    let mut enabled_tools = enabled_tools;
    let mut tools_open = use_signal(|| false);
    let model_label = match models.as_slice() {
        [only] => Some(only.name.clone()),
        _ => None,
    };

    let onkeydown = move |e: KeyboardEvent| {
        if e.key() == Key::Enter && !e.modifiers().shift() && !e.is_composing() {
            e.prevent_default();
            on_submit.call(());
        }
    };

    rsx! {
        div {
            class: "prompt-input",
            textarea {
                id: PROMPT_INPUT_ID,
                class: "chat-textarea",
                placeholder: "What would you like to know?",
                value: "{value}",
                rows: "1",
                autofocus: true,
                oninput: move |e| value.set(e.value()),
                onkeydown,
            }

            div {
                class: "prompt-toolbar",
                div {
                    class: "prompt-tools",
                    if !tools.is_empty() {
                        div {
                            class: "tools-menu",
                            button {
                                class: "icon-button tools-trigger",
                                title: "Tools",
                                onclick: move |_| tools_open.toggle(),
                                "⚙"
                            }
                            if tools_open() {
                                div {
                                    class: "tools-dropdown",
                                    for tool in tools.iter().cloned() {
                                        ToolToggle {
                                            key: "{tool.id}",
                                            enabled: enabled_tools.read().contains(&tool.id),
                                            on_toggle: move |id: String| {
                                                toggle_tool(&mut enabled_tools.write(), &id)
                                            },
                                            tool: tool.clone(),
                                        }
                                    }
                                }
                            }
                        }
                    }

                    if let Some(label) = model_label {
                        span { class: "model-label", "{label}" }
                    } else if !models.is_empty() {
                        select {
                            class: "model-select",
                            value: "{selected_model}",
                            onchange: move |e| selected_model.set(e.value()),
                            for model in models.iter() {
                                option {
                                    key: "{model.id}",
                                    value: "{model.id}",
                                    selected: *selected_model.read() == model.id,
                                    "{model.name}"
                                }
                            }
                        }
                    }
                }

                if busy {
                    button {
                        class: "send-button stop",
                        title: "Stop",
                        onclick: move |_| on_stop.call(()),
                        "■"
                    }
                } else {
                    button {
                        class: "send-button",
                        title: "Send",
                        disabled: value.read().is_empty(),
                        onclick: move |_| on_submit.call(()),
                        "➤"
                    }
                }
            }
        }
    }
}

#[component]
fn ToolToggle(tool: BuiltinTool, enabled: bool, on_toggle: EventHandler<String>) -> Element {
    let id = tool.id.clone();

    rsx! {
        div {
            class: "tool-toggle",
            onclick: move |_| on_toggle.call(id.clone()),
            span { class: "tool-icon", "{tool_icon(&tool.id)}" }
            span { class: "tool-name", "{tool.name}" }
            span {
                class: if enabled { "switch on" } else { "switch" },
                role: "switch",
                aria_checked: "{enabled}",
            }
        }
    }
}
