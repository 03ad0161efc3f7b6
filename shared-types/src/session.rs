//! Which conversation the in-memory messages belong to, and which response
//! stream may still write into them
//!
//! The browser layer holds the signals, the abort controller and the timers;
//! [`SessionState`] only decides.

use crate::message::UiMessage;
use crate::routing::ConversationId;

/// Identifies one response stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamTicket {
    pub conversation: ConversationId,
    pub generation: u64,
}

/// What switching to a conversation requires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenPlan {
    /// The response for this conversation is already streaming in, e.g. right
    /// after submitting from `/`; keep the messages as they are
    KeepStreaming,
    /// Flush the messages to `previous`, abort `aborted`, then load the new id
    Switch {
        previous: ConversationId,
        aborted: Option<StreamTicket>,
    },
}

/// Where a submitted message goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTarget {
    pub conversation: ConversationId,
    /// Submitted from `/`: the entry must be recorded and the URL pushed
    pub is_new: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    owner: ConversationId,
    streaming: Option<StreamTicket>,
    generation: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The conversation the in-memory messages are persisted under
    pub fn owner(&self) -> &ConversationId {
        &self.owner
    }

    pub fn streaming(&self) -> Option<&StreamTicket> {
        self.streaming.as_ref()
    }

    pub fn open(&mut self, id: &ConversationId) -> OpenPlan {
        if self
            .streaming
            .as_ref()
            .is_some_and(|ticket| &ticket.conversation == id)
        {
            return OpenPlan::KeepStreaming;
        }
        let previous = std::mem::replace(&mut self.owner, id.clone());
        OpenPlan::Switch {
            previous,
            aborted: self.streaming.take(),
        }
    }

    /// Pick the conversation for a message typed while `current` is shown
    pub fn submit_target(&mut self, current: &ConversationId) -> SubmitTarget {
        let is_new = current.is_root();
        let conversation = if is_new {
            ConversationId::generate()
        } else {
            current.clone()
        };
        self.owner = conversation.clone();
        SubmitTarget {
            conversation,
            is_new,
        }
    }

    /// Start a stream into the owner, superseding any earlier one
    pub fn start_stream(&mut self) -> StreamTicket {
        self.generation += 1;
        let ticket = StreamTicket {
            conversation: self.owner.clone(),
            generation: self.generation,
        };
        self.streaming = Some(ticket.clone());
        ticket
    }

    /// Whether the stream `generation` may still write
    pub fn is_current(&self, generation: u64) -> bool {
        self.streaming
            .as_ref()
            .is_some_and(|ticket| ticket.generation == generation)
    }

    /// End stream `generation`; `false` when it was already superseded
    pub fn settle(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.streaming = None;
        true
    }

    /// Stop the active stream, returning it so the caller can abort it.
    /// Messages already shown stay.
    pub fn stop(&mut self) -> Option<StreamTicket> {
        self.streaming.take()
    }
}

/// Put the streamed assistant message on screen: appended once it has parts,
/// replaced on later updates. Returns whether the list changed.
pub fn show_streamed(messages: &mut Vec<UiMessage>, message: &UiMessage, shown: &mut bool) -> bool {
    if !*shown && message.parts.is_empty() {
        return false;
    }
    match messages.last_mut() {
        Some(last) if *shown => *last = message.clone(),
        _ => {
            messages.push(message.clone());
            *shown = true;
        }
    }
    true
}
