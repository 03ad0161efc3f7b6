pub mod api;
pub mod chat;
pub mod hooks;
pub mod interop;
pub mod markdown;
pub mod sidebar;
pub mod storage;
pub mod styles;
pub mod theme;
pub mod tool_icons;

pub use api::{api_url, fetch_remote_config, open_chat_stream, ApiError, ChatStream};
pub use chat::{ChatSession, ChatView};
pub use hooks::{navigate, use_conversation_id, use_conversations, AppState};
pub use sidebar::AppSidebar;
pub use storage::BrowserStorage;
pub use styles::APP_STYLES;
pub use theme::{apply_theme, cached_theme, ModeToggle, Theme};
