use dioxus::launch;
use dioxus::prelude::*;
use dioxus_logger::tracing::Level;

use chat_ui::{
    apply_theme, cached_theme, use_conversation_id, use_conversations, AppSidebar, AppState,
    ChatView, APP_STYLES,
};

fn main() {
    // Initialize logging for WASM
    wasm_logger::init(wasm_logger::Config::default());
    dioxus_logger::init(Level::INFO).ok();

    launch(App);
}

#[component]
fn App() -> Element {
    let conversation_id = use_conversation_id();
    let conversations = use_conversations();
    use_context_provider(|| AppState {
        conversation_id,
        conversations,
    });
    use_hook(|| apply_theme(cached_theme()));

    rsx! {
        style { {APP_STYLES} }
        div {
            class: "app-layout",
            AppSidebar {}
            main {
                class: "chat-column",
                ChatView {}
            }
        }
    }
}
