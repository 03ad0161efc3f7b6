use std::rc::Rc;

use dioxus::prelude::*;
use shared_types::KeyValueStore;
use web_sys::Event;

use crate::interop::{dark_scheme_query, prefers_dark, EventListener};
use crate::storage::BrowserStorage;

/// Shared with earlier builds of the app so saved preferences carry over
pub const THEME_STORAGE_KEY: &str = "pydantic-chat-ui-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::System => "system",
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "system" => Some(Theme::System),
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    /// system → light → dark → system
    pub fn next(self) -> Self {
        match self {
            Theme::System => Theme::Light,
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::System,
        }
    }

    pub fn tooltip(&self) -> &'static str {
        match self {
            Theme::System => "Switch to light theme",
            Theme::Light => "Switch to dark theme",
            Theme::Dark => "Switch to system theme",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Theme::System => "🖥",
            Theme::Light => "☀",
            Theme::Dark => "☾",
        }
    }

    /// Whether the OS color scheme decides the look
    pub fn follows_system(self) -> bool {
        self == Theme::System
    }

    /// The concrete `data-theme` value
    pub fn resolve(self, system_is_dark: bool) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System if system_is_dark => "dark",
            Theme::System => "light",
        }
    }
}

pub fn cached_theme() -> Theme {
    BrowserStorage::local()
        .ok()
        .and_then(|store| store.get(THEME_STORAGE_KEY))
        .and_then(|value| Theme::parse(&value))
        .unwrap_or_default()
}

pub fn cache_theme(theme: Theme) {
    let result = BrowserStorage::local().and_then(|store| store.set(THEME_STORAGE_KEY, theme.as_str()));
    if let Err(e) = result {
        dioxus_logger::tracing::warn!("Failed to store theme preference: {}", e);
    }
}

pub fn apply_theme(theme: Theme) {
    if let Some(root) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    {
        let _ = root.set_attribute("data-theme", theme.resolve(prefers_dark()));
    }
}

#[component]
pub fn ModeToggle() -> Element {
    let mut theme = use_signal(cached_theme);

    // Re-apply when the OS switches between light and dark
    use_hook(move || {
        Rc::new(dark_scheme_query().and_then(|query| {
            EventListener::new(query.into(), "change", move |_: Event| {
                let current = *theme.peek();
                if current.follows_system() {
                    apply_theme(current);
                }
            })
        }))
    });

    let onclick = move |_| {
        let next = theme().next();
        cache_theme(next);
        apply_theme(next);
        theme.set(next);
    };

    rsx! {
        button {
            class: "icon-button mode-toggle",
            title: "{theme().tooltip()}",
            aria_label: "Toggle theme",
            onclick,
            "{theme().glyph()}"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_through_all_three_themes() {
        assert_eq!(Theme::System.next(), Theme::Light);
        assert_eq!(Theme::Light.next(), Theme::Dark);
        assert_eq!(Theme::Dark.next(), Theme::System);
    }

    #[test]
    fn tooltip_names_the_next_theme() {
        for theme in [Theme::System, Theme::Light, Theme::Dark] {
            assert!(theme.tooltip().ends_with(&format!("{} theme", theme.next().as_str())));
        }
    }

    #[test]
    fn stored_values_parse_back() {
        for theme in [Theme::System, Theme::Light, Theme::Dark] {
            assert_eq!(Theme::parse(theme.as_str()), Some(theme));
        }
        assert_eq!(Theme::parse("sepia"), None);
    }

    #[test]
    fn only_system_tracks_os_changes() {
        assert!(Theme::System.follows_system());
        assert!(!Theme::Light.follows_system());
        assert!(!Theme::Dark.follows_system());
    }

    #[test]
    fn system_follows_the_color_scheme() {
        assert_eq!(Theme::System.resolve(true), "dark");
        assert_eq!(Theme::System.resolve(false), "light");
        assert_eq!(Theme::Light.resolve(true), "light");
    }
}
