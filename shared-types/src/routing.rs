//! URL-path conversation routing
//!
//! The address bar path *is* the conversation id: `/` is a fresh
//! conversation, `/3f2b8c1e9a7d4b6f8e0c5a1d2b3c4e5f` is a stored one.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fired by the browser on back/forward navigation
pub const EVENT_POPSTATE: &str = "popstate";

/// Fired by the browser in *other* tabs when local storage changes
pub const EVENT_STORAGE: &str = "storage";

/// Same-tab notification after `history.pushState`
pub const EVENT_HISTORY_STATE_CHANGED: &str = "history-state-changed";

/// Same-tab notification after the conversation index was rewritten
pub const EVENT_LOCAL_STORAGE_CHANGE: &str = "local-storage-change";

const ROOT_PATH: &str = "/";

/// Conversation identifier: the browser URL path
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    /// The id of a conversation that has not been started yet
    pub fn root() -> Self {
        Self(ROOT_PATH.to_string())
    }

    /// Build an id from `location.pathname`, used as-is
    pub fn from_path(path: &str) -> Self {
        if path.is_empty() {
            return Self::root();
        }
        Self(path.to_string())
    }

    /// Fresh id for a new conversation: `/` followed by a simple uuid v4
    pub fn generate() -> Self {
        Self(format!("/{}", uuid::Uuid::new_v4().simple()))
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT_PATH
    }

    /// The path, which doubles as the local storage key of the messages
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a click on a conversation link should be handled in-page.
///
/// Middle clicks and cmd/ctrl clicks keep the browser default so links can
/// still be opened in a new tab.
pub fn is_plain_left_click(button: i16, meta_key: bool, ctrl_key: bool) -> bool {
    button == 0 && !meta_key && !ctrl_key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_slash_paths_are_root() {
        assert!(ConversationId::from_path("").is_root());
        assert!(ConversationId::from_path("/").is_root());
        assert!(!ConversationId::from_path("/abc").is_root());
        assert_eq!(ConversationId::from_path("abc").as_str(), "abc");
        assert_eq!(ConversationId::from_path("/a/b").as_str(), "/a/b");
    }

    #[test]
    fn generated_ids_are_url_safe_and_distinct() {
        let a = ConversationId::generate();
        let b = ConversationId::generate();
        assert_ne!(a, b);
        assert!(!a.is_root());
        assert!(a.as_str().starts_with('/'));
        assert_eq!(a.as_str().len(), 33);
        assert!(a.as_str()[1..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn only_unmodified_primary_clicks_are_intercepted() {
        assert!(is_plain_left_click(0, false, false));
        assert!(!is_plain_left_click(1, false, false));
        assert!(!is_plain_left_click(0, true, false));
        assert!(!is_plain_left_click(0, false, true));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = ConversationId::from_path("/xyz");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"/xyz\"");
    }
}
