//! In-memory conversation state and the request/stream lifecycle

use dioxus::prelude::*;
use dioxus_logger::tracing::{debug, error, info, warn};
use futures_util::{pin_mut, StreamExt};
use gloo_timers::future::TimeoutFuture;
use shared_types::{
    show_streamed, truncate_for_regenerate, ChatRequest, ChatStatus, ChatTrigger, ChunkOutcome,
    ConversationId, MessageAccumulator, OpenPlan, SessionState, StreamTicket, SubmitTarget,
    Throttle, ThrottleDecision, UiMessage, PERSIST_THROTTLE_MS,
};
use web_sys::{AbortController, AbortSignal};

use crate::api::{open_chat_stream, ApiError};
use crate::hooks::navigate;
use crate::interop::{js_error_message, monotonic_ms};
use crate::storage;

/// Model and tool selection sent with a request
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequestOptions {
    pub model: String,
    pub builtin_tools: Vec<String>,
}

/// Handle to the chat state of the current page.
///
/// Storage writes always go to [`SessionState::owner`], never to whatever the
/// URL says right now.
#[derive(Clone, Copy)]
pub struct ChatSession {
    pub messages: Signal<Vec<UiMessage>>,
    pub status: Signal<ChatStatus>,
    pub error: Signal<Option<String>>,
    pub not_found: Signal<bool>,
    state: Signal<SessionState>,
    controller: Signal<Option<AbortController>>,
    throttle: Signal<Throttle>,
}

pub fn use_chat_session() -> ChatSession {
    ChatSession {
        messages: use_signal(Vec::new),
        status: use_signal(ChatStatus::default),
        error: use_signal(|| None),
        not_found: use_signal(|| false),
        state: use_signal(SessionState::new),
        controller: use_signal(|| None),
        throttle: use_signal(|| Throttle::new(PERSIST_THROTTLE_MS)),
    }
}

impl ChatSession {
    /// Show conversation `id`: empty for the root, otherwise its stored
    /// messages. A response still streaming into another conversation is
    /// aborted.
    pub fn open(&mut self, id: &ConversationId) {
        let plan = self.state.write().open(id);
        let OpenPlan::Switch { previous, aborted } = plan else {
            return;
        };

        storage::persist_messages(&previous, &self.messages.peek());
        if let Some(ticket) = aborted {
            self.abort(&ticket);
        }
        self.throttle.write().reset();
        self.status.set(ChatStatus::Ready);
        self.error.set(None);

        if id.is_root() {
            self.messages.set(Vec::new());
            self.not_found.set(false);
            return;
        }

        match storage::stored_messages(id) {
            Some(messages) => {
                debug!("Loaded {} messages for {}", messages.len(), id);
                self.messages.set(messages);
                self.not_found.set(false);
            }
            None => {
                self.messages.set(Vec::new());
                self.not_found.set(true);
            }
        }
    }

    /// Send `text` as a new user message. Returns whether it was sent.
    pub fn submit(
        &mut self,
        text: &str,
        current: &ConversationId,
        options: RequestOptions,
    ) -> bool {
        if text.trim().is_empty() || self.status.peek().is_busy() {
            return false;
        }

        let SubmitTarget {
            conversation,
            is_new,
        } = self.state.write().submit_target(current);

        if let Err(e) = storage::start_conversation(&conversation, text) {
            error!("Failed to record conversation {}: {}", conversation, e);
        }
        self.not_found.set(false);
        self.messages.write().push(UiMessage::user_text(text));
        self.persist_now();

        self.start(ChatTrigger::SubmitMessage, None, options);

        if is_new {
            info!("Started conversation {}", conversation);
            navigate(&conversation);
        }
        true
    }

    /// Answer `message_id` again, dropping it (assistant) or its followers (user)
    pub fn regenerate(&mut self, message_id: &str, options: RequestOptions) {
        if self.status.peek().is_busy() || self.state.peek().owner().is_root() {
            return;
        }
        let truncated = truncate_for_regenerate(&mut self.messages.write(), message_id);
        if !truncated {
            warn!("Cannot regenerate unknown message {}", message_id);
            return;
        }
        self.start(
            ChatTrigger::RegenerateMessage,
            Some(message_id.to_string()),
            options,
        );
    }

    /// Abort the in-flight response, keeping what already arrived
    pub fn stop(&mut self) {
        let stopped = self.state.write().stop();
        if let Some(ticket) = stopped {
            self.abort(&ticket);
        }
        self.status.set(ChatStatus::Ready);
        self.persist_now();
    }

    /// Throttled write of the message list, called on every change
    pub fn schedule_persist(&mut self) {
        let decision = self.throttle.write().on_change(monotonic_ms());
        match decision {
            ThrottleDecision::Fire => self.persist_now(),
            ThrottleDecision::Schedule(delay_ms) => {
                let mut session = *self;
                spawn(async move {
                    TimeoutFuture::new(delay_ms.ceil() as u32).await;
                    session.throttle.write().on_trailing_fired(monotonic_ms());
                    session.persist_now();
                });
            }
            ThrottleDecision::Coalesce => {}
        }
    }

    fn persist_now(&self) {
        storage::persist_messages(self.state.peek().owner(), &self.messages.peek());
    }

    fn abort(&mut self, ticket: &StreamTicket) {
        if let Some(controller) = self.controller.write().take() {
            debug!(
                "Aborting response {} for {}",
                ticket.generation, ticket.conversation
            );
            controller.abort();
        }
    }

    fn start(&mut self, trigger: ChatTrigger, message_id: Option<String>, options: RequestOptions) {
        let controller = match AbortController::new() {
            Ok(controller) => controller,
            Err(e) => {
                self.fail(js_error_message(&e));
                return;
            }
        };
        let signal = controller.signal();
        if let Some(previous) = self.controller.write().replace(controller) {
            previous.abort();
        }
        let ticket = self.state.write().start_stream();

        let request = ChatRequest {
            id: ticket
                .conversation
                .as_str()
                .trim_start_matches('/')
                .to_string(),
            messages: self.messages.peek().clone(),
            trigger,
            message_id,
            model: options.model,
            builtin_tools: options.builtin_tools,
            web_search: true,
        };

        self.status.set(ChatStatus::Submitted);
        self.error.set(None);

        let mut session = *self;
        spawn(async move {
            session.receive(request, signal, ticket.generation).await;
        });
    }

    async fn receive(&mut self, request: ChatRequest, signal: AbortSignal, generation: u64) {
        let chat_stream = match open_chat_stream(&request, &signal).await {
            Ok(chat_stream) => chat_stream,
            Err(ApiError::Aborted) => return,
            Err(e) => {
                error!("Chat request failed: {}", e);
                self.settle(generation, ChatStatus::Error, Some(e.to_string()));
                return;
            }
        };

        let chunks = chat_stream.into_stream();
        pin_mut!(chunks);

        let mut accumulator = MessageAccumulator::new();
        let mut shown = false;

        while let Some(item) = chunks.next().await {
            if !self.is_current(generation) {
                return;
            }
            let chunk = match item {
                Ok(chunk) => chunk,
                Err(ApiError::Stream(e)) => {
                    warn!("Skipping stream chunk: {}", e);
                    continue;
                }
                Err(ApiError::Aborted) => return,
                Err(e) => {
                    error!("Chat stream failed: {}", e);
                    self.settle(generation, ChatStatus::Error, Some(e.to_string()));
                    return;
                }
            };

            match accumulator.apply(chunk) {
                Ok(ChunkOutcome::Updated) => self.show(accumulator.message(), &mut shown),
                Ok(ChunkOutcome::Unchanged) => {}
                Ok(ChunkOutcome::Finished) | Ok(ChunkOutcome::Aborted) => {
                    self.show(accumulator.message(), &mut shown);
                    self.settle(generation, ChatStatus::Ready, None);
                    return;
                }
                Ok(ChunkOutcome::Failed(message)) => {
                    self.show(accumulator.message(), &mut shown);
                    self.settle(generation, ChatStatus::Error, Some(message));
                    return;
                }
                Err(e) => warn!("Skipping stream chunk: {}", e),
            }
        }

        if self.is_current(generation) {
            self.show(accumulator.message(), &mut shown);
            self.settle(generation, ChatStatus::Ready, None);
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.state.peek().is_current(generation)
    }

    fn show(&mut self, message: &UiMessage, shown: &mut bool) {
        let changed = show_streamed(&mut self.messages.write(), message, shown);
        if changed && *self.status.peek() == ChatStatus::Submitted {
            self.status.set(ChatStatus::Streaming);
        }
    }

    fn settle(&mut self, generation: u64, status: ChatStatus, error: Option<String>) {
        if !self.state.write().settle(generation) {
            return;
        }
        self.controller.set(None);
        self.status.set(status);
        self.error.set(error);
    }

    fn fail(&mut self, message: String) {
        error!("Chat request failed: {}", message);
        self.status.set(ChatStatus::Error);
        self.error.set(Some(message));
    }
}
