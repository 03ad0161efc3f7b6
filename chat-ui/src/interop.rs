use shared_types::EVENT_HISTORY_STATE_CHANGED;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{window, Event, EventTarget, HtmlElement, MediaQueryList};

/// Pixels from the bottom that still count as "scrolled to the bottom"
const BOTTOM_THRESHOLD_PX: i32 = 48;

/// An event listener that is removed again when dropped
pub struct EventListener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl EventListener {
    pub fn new(
        target: EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Option<Self> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        if let Err(e) =
            target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        {
            log::error!("Failed to listen for {}: {}", event, js_error_message(&e));
            return None;
        }
        Some(Self {
            target,
            event,
            callback,
        })
    }

    /// Listen on `window`
    pub fn window(event: &'static str, handler: impl FnMut(Event) + 'static) -> Option<Self> {
        Self::new(window()?.into(), event, handler)
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// Fire a plain `Event` named `name` on `window`
pub fn dispatch_window_event(name: &str) {
    let Some(window) = window() else {
        return;
    };
    match Event::new(name) {
        Ok(event) => {
            let _ = window.dispatch_event(&event);
        }
        Err(e) => log::error!("Failed to create {} event: {}", name, js_error_message(&e)),
    }
}

pub fn current_path() -> String {
    window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// `history.pushState` to `path`, then notify same-tab listeners
pub fn push_path(path: &str) {
    let Some(history) = window().and_then(|w| w.history().ok()) else {
        return;
    };
    if let Err(e) = history.push_state_with_url(&JsValue::NULL, "", Some(path)) {
        log::error!("pushState to {} failed: {}", path, js_error_message(&e));
        return;
    }
    dispatch_window_event(EVENT_HISTORY_STATE_CHANGED);
}

fn element_by_id(id: &str) -> Option<HtmlElement> {
    window()?
        .document()?
        .get_element_by_id(id)?
        .dyn_into::<HtmlElement>()
        .ok()
}

pub fn focus_element(id: &str) {
    if let Some(element) = element_by_id(id) {
        let _ = element.focus();
    }
}

pub fn scroll_to_bottom(id: &str) {
    if let Some(element) = element_by_id(id) {
        element.set_scroll_top(element.scroll_height());
    }
}

pub fn is_scrolled_to_bottom(id: &str) -> bool {
    element_by_id(id).map_or(true, |element| {
        element.scroll_height() - element.scroll_top() - element.client_height()
            <= BOTTOM_THRESHOLD_PX
    })
}

pub fn dark_scheme_query() -> Option<MediaQueryList> {
    window()?
        .match_media("(prefers-color-scheme: dark)")
        .ok()
        .flatten()
}

pub fn prefers_dark() -> bool {
    dark_scheme_query().is_some_and(|query| query.matches())
}

pub async fn copy_to_clipboard(text: &str) -> Result<(), String> {
    let window = window().ok_or_else(|| "no window".to_string())?;
    let promise = window.navigator().clipboard().write_text(text);
    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|e| js_error_message(&e))
}

/// Monotonic milliseconds from `performance.now()`, falling back to the wall clock
pub fn monotonic_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|performance| performance.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Best-effort human readable text for a thrown JS value
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
