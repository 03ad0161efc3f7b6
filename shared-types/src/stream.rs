//! Decoding of the `/api/chat` UI message stream
//!
//! The response body is Server-Sent Events; every `data:` payload is one JSON
//! [`StreamChunk`] and the stream ends with `data: [DONE]`. Chunks are folded
//! into the assistant [`UiMessage`] by [`MessageAccumulator`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::message::{
    FilePart, MessagePart, PartState, Role, SourceDocumentPart, SourceUrlPart, TextPart, ToolPart,
    ToolState, UiMessage,
};

const DONE_SENTINEL: &str = "[DONE]";

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum StreamError {
    #[error("invalid stream chunk: {0}")]
    InvalidChunk(String),

    #[error("{kind} delta for unknown part {id}")]
    UnknownPart { kind: &'static str, id: String },

    #[error("output for unknown tool call {0}")]
    UnknownToolCall(String),
}

// ============================================================================
// SSE framing
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum SseEvent {
    Data(String),
    Done,
}

/// Incremental SSE decoder over raw body bytes.
///
/// Bytes are buffered until a full line is available, so UTF-8 sequences
/// split across network reads decode correctly.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data_lines: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(bytes);
        let mut events = Vec::new();

        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let mut line: Vec<u8> = self.buffer.drain(..=newline).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            let line = String::from_utf8_lossy(&line);
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
        }

        events
    }

    /// Flush an event left without a terminating blank line
    pub fn finish(&mut self) -> Vec<SseEvent> {
        let mut events = Vec::new();
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&rest);
            if let Some(event) = self.process_line(line.trim_end_matches('\r')) {
                events.push(event);
            }
        }
        if let Some(event) = self.dispatch() {
            events.push(event);
        }
        events
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }
        // A line without a colon is a field name with an empty value
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        if field == "data" {
            self.data_lines.push(value.to_string());
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        if self.data_lines.is_empty() {
            return None;
        }
        let data = self.data_lines.join("\n");
        self.data_lines.clear();
        if data == DONE_SENTINEL {
            Some(SseEvent::Done)
        } else {
            Some(SseEvent::Data(data))
        }
    }
}

// ============================================================================
// Chunks
// ============================================================================

/// One UI message stream chunk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum StreamChunk {
    Start {
        message_id: Option<String>,
        message_metadata: Option<Value>,
    },
    Finish {
        message_metadata: Option<Value>,
    },
    Abort,
    Error {
        error_text: String,
    },
    StartStep,
    FinishStep,
    TextStart {
        id: String,
    },
    TextDelta {
        id: String,
        delta: String,
    },
    TextEnd {
        id: String,
    },
    ReasoningStart {
        id: String,
    },
    ReasoningDelta {
        id: String,
        delta: String,
    },
    ReasoningEnd {
        id: String,
    },
    ToolInputStart {
        tool_call_id: String,
        tool_name: String,
        dynamic: Option<bool>,
    },
    ToolInputDelta {
        tool_call_id: String,
        input_text_delta: String,
    },
    ToolInputAvailable {
        tool_call_id: String,
        tool_name: String,
        input: Value,
        dynamic: Option<bool>,
    },
    ToolInputError {
        tool_call_id: String,
        tool_name: String,
        input: Value,
        error_text: String,
        dynamic: Option<bool>,
    },
    ToolOutputAvailable {
        tool_call_id: String,
        output: Value,
    },
    ToolOutputError {
        tool_call_id: String,
        error_text: String,
    },
    SourceUrl {
        source_id: String,
        url: String,
        title: Option<String>,
    },
    SourceDocument {
        source_id: String,
        media_type: String,
        title: String,
        filename: Option<String>,
    },
    File {
        url: String,
        media_type: String,
    },
    MessageMetadata {
        message_metadata: Value,
    },
    #[serde(other)]
    Unknown,
}

pub fn parse_chunk(payload: &str) -> Result<StreamChunk, StreamError> {
    serde_json::from_str(payload).map_err(|e| StreamError::InvalidChunk(e.to_string()))
}

// ============================================================================
// Accumulation
// ============================================================================

/// What a chunk did to the response as a whole
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkOutcome {
    Updated,
    Unchanged,
    Finished,
    Aborted,
    Failed(String),
}

/// Builds the streamed assistant message chunk by chunk
#[derive(Debug, Clone)]
pub struct MessageAccumulator {
    message: UiMessage,
    open_text: HashMap<String, usize>,
    open_reasoning: HashMap<String, usize>,
    tool_inputs: HashMap<String, String>,
}

impl Default for MessageAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageAccumulator {
    pub fn new() -> Self {
        Self {
            message: UiMessage::new(Role::Assistant),
            open_text: HashMap::new(),
            open_reasoning: HashMap::new(),
            tool_inputs: HashMap::new(),
        }
    }

    pub fn message(&self) -> &UiMessage {
        &self.message
    }

    pub fn into_message(self) -> UiMessage {
        self.message
    }

    pub fn apply(&mut self, chunk: StreamChunk) -> Result<ChunkOutcome, StreamError> {
        match chunk {
            StreamChunk::Start {
                message_id,
                message_metadata,
            } => {
                if let Some(id) = message_id {
                    self.message.id = id;
                }
                self.merge_metadata(message_metadata);
            }
            StreamChunk::Finish { message_metadata } => {
                self.merge_metadata(message_metadata);
                self.close_open_parts();
                return Ok(ChunkOutcome::Finished);
            }
            StreamChunk::Abort => {
                self.close_open_parts();
                return Ok(ChunkOutcome::Aborted);
            }
            StreamChunk::Error { error_text } => {
                self.close_open_parts();
                return Ok(ChunkOutcome::Failed(error_text));
            }
            StreamChunk::StartStep => self.message.parts.push(MessagePart::StepStart),
            StreamChunk::FinishStep => self.close_open_parts(),
            StreamChunk::TextStart { id } => {
                self.open_text.insert(id, self.message.parts.len());
                self.message
                    .parts
                    .push(MessagePart::Text(TextPart::streaming()));
            }
            StreamChunk::TextDelta { id, delta } => {
                self.text_part_mut("text", &id)?.text.push_str(&delta);
            }
            StreamChunk::TextEnd { id } => {
                self.text_part_mut("text", &id)?.state = Some(PartState::Done);
                self.open_text.remove(&id);
            }
            StreamChunk::ReasoningStart { id } => {
                self.open_reasoning.insert(id, self.message.parts.len());
                self.message
                    .parts
                    .push(MessagePart::Reasoning(TextPart::streaming()));
            }
            StreamChunk::ReasoningDelta { id, delta } => {
                self.text_part_mut("reasoning", &id)?
                    .text
                    .push_str(&delta);
            }
            StreamChunk::ReasoningEnd { id } => {
                self.text_part_mut("reasoning", &id)?.state = Some(PartState::Done);
                self.open_reasoning.remove(&id);
            }
            StreamChunk::ToolInputStart {
                tool_call_id,
                tool_name,
                dynamic,
            } => {
                self.tool_inputs.insert(tool_call_id.clone(), String::new());
                self.message.parts.push(MessagePart::Tool(ToolPart::new(
                    tool_name,
                    tool_call_id,
                    dynamic.unwrap_or(false),
                )));
            }
            StreamChunk::ToolInputDelta {
                tool_call_id,
                input_text_delta,
            } => {
                let buffer = self
                    .tool_inputs
                    .get_mut(&tool_call_id)
                    .ok_or_else(|| StreamError::UnknownToolCall(tool_call_id.clone()))?;
                buffer.push_str(&input_text_delta);
                let parsed = serde_json::from_str::<Value>(buffer).ok();
                let tool = self.tool_part_mut(&tool_call_id)?;
                if parsed.is_some() {
                    tool.input = parsed;
                }
            }
            StreamChunk::ToolInputAvailable {
                tool_call_id,
                tool_name,
                input,
                dynamic,
            } => {
                self.tool_inputs.remove(&tool_call_id);
                let tool = self.tool_part_or_insert(&tool_call_id, tool_name, dynamic)?;
                tool.state = ToolState::InputAvailable;
                tool.input = Some(input);
            }
            StreamChunk::ToolInputError {
                tool_call_id,
                tool_name,
                input,
                error_text,
                dynamic,
            } => {
                self.tool_inputs.remove(&tool_call_id);
                let tool = self.tool_part_or_insert(&tool_call_id, tool_name, dynamic)?;
                tool.state = ToolState::OutputError;
                tool.input = Some(input);
                tool.error_text = Some(error_text);
            }
            StreamChunk::ToolOutputAvailable {
                tool_call_id,
                output,
            } => {
                let tool = self.tool_part_mut(&tool_call_id)?;
                tool.state = ToolState::OutputAvailable;
                tool.output = Some(output);
            }
            StreamChunk::ToolOutputError {
                tool_call_id,
                error_text,
            } => {
                let tool = self.tool_part_mut(&tool_call_id)?;
                tool.state = ToolState::OutputError;
                tool.error_text = Some(error_text);
            }
            StreamChunk::SourceUrl {
                source_id,
                url,
                title,
            } => self.message.parts.push(MessagePart::SourceUrl(SourceUrlPart {
                source_id,
                url,
                title,
            })),
            StreamChunk::SourceDocument {
                source_id,
                media_type,
                title,
                filename,
            } => self
                .message
                .parts
                .push(MessagePart::SourceDocument(SourceDocumentPart {
                    source_id,
                    media_type,
                    title,
                    filename,
                })),
            StreamChunk::File { url, media_type } => {
                self.message.parts.push(MessagePart::File(FilePart {
                    media_type,
                    url,
                    filename: None,
                }))
            }
            StreamChunk::MessageMetadata { message_metadata } => {
                self.merge_metadata(Some(message_metadata));
            }
            StreamChunk::Unknown => return Ok(ChunkOutcome::Unchanged),
        }
        Ok(ChunkOutcome::Updated)
    }

    fn text_part_mut(&mut self, kind: &'static str, id: &str) -> Result<&mut TextPart, StreamError> {
        let open = if kind == "reasoning" {
            &self.open_reasoning
        } else {
            &self.open_text
        };
        let unknown = || StreamError::UnknownPart {
            kind,
            id: id.to_string(),
        };
        let index = *open.get(id).ok_or_else(unknown)?;
        match self.message.parts.get_mut(index) {
            Some(MessagePart::Text(part)) | Some(MessagePart::Reasoning(part)) => Ok(part),
            _ => Err(unknown()),
        }
    }

    fn tool_part_mut(&mut self, tool_call_id: &str) -> Result<&mut ToolPart, StreamError> {
        self.message
            .parts
            .iter_mut()
            .find_map(|part| match part {
                MessagePart::Tool(tool) if tool.tool_call_id == tool_call_id => Some(tool),
                _ => None,
            })
            .ok_or_else(|| StreamError::UnknownToolCall(tool_call_id.to_string()))
    }

    fn tool_part_or_insert(
        &mut self,
        tool_call_id: &str,
        tool_name: String,
        dynamic: Option<bool>,
    ) -> Result<&mut ToolPart, StreamError> {
        if self.tool_part_mut(tool_call_id).is_err() {
            self.message.parts.push(MessagePart::Tool(ToolPart::new(
                tool_name,
                tool_call_id,
                dynamic.unwrap_or(false),
            )));
        }
        self.tool_part_mut(tool_call_id)
    }

    fn close_open_parts(&mut self) {
        for index in self.open_text.drain().chain(self.open_reasoning.drain()).map(|(_, i)| i) {
            if let Some(MessagePart::Text(part) | MessagePart::Reasoning(part)) =
                self.message.parts.get_mut(index)
            {
                part.state = Some(PartState::Done);
            }
        }
    }

    fn merge_metadata(&mut self, metadata: Option<Value>) {
        let Some(incoming) = metadata else {
            return;
        };
        match (&mut self.message.metadata, incoming) {
            (Some(Value::Object(existing)), Value::Object(update)) => existing.extend(update),
            (slot, incoming) => *slot = Some(incoming),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chunks(payloads: &[Value]) -> Vec<StreamChunk> {
        payloads
            .iter()
            .map(|p| parse_chunk(&p.to_string()).unwrap())
            .collect()
    }

    #[test]
    fn sse_events_survive_arbitrary_splits() {
        let body = "data: {\"type\":\"text-delta\",\"id\":\"t\",\"delta\":\"héllo\"}\r\n\r\n: keep-alive\n\ndata: [DONE]\n\n";
        let bytes = body.as_bytes();

        for split in 1..bytes.len() {
            let mut decoder = SseDecoder::new();
            let mut events = decoder.push(&bytes[..split]);
            events.extend(decoder.push(&bytes[split..]));
            events.extend(decoder.finish());
            assert_eq!(events.len(), 2, "split at {split}");
            assert_eq!(
                events[0],
                SseEvent::Data("{\"type\":\"text-delta\",\"id\":\"t\",\"delta\":\"héllo\"}".to_string())
            );
            assert_eq!(events[1], SseEvent::Done);
        }
    }

    #[test]
    fn multi_line_data_is_joined_and_trailing_event_flushed() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"event: message\ndata: a\ndata: b\n").is_empty());
        assert_eq!(decoder.finish(), vec![SseEvent::Data("a\nb".to_string())]);
    }

    #[test]
    fn bare_data_field_counts_as_an_empty_line() {
        let mut decoder = SseDecoder::new();
        assert_eq!(
            decoder.push(b"data\ndata: x\n\ndata\n\n"),
            vec![
                SseEvent::Data("\nx".to_string()),
                SseEvent::Data(String::new()),
            ]
        );
        assert!(decoder.push(b"database: y\n\n").is_empty());
    }

    #[test]
    fn unknown_chunk_types_are_ignored() {
        assert_eq!(
            parse_chunk(r#"{"type":"data-weather","data":{}}"#).unwrap(),
            StreamChunk::Unknown
        );
        assert!(parse_chunk("not json").is_err());
    }

    #[test]
    fn text_and_reasoning_stream_into_one_message() {
        let mut acc = MessageAccumulator::new();
        for chunk in chunks(&[
            json!({"type": "start", "messageId": "srv-1"}),
            json!({"type": "start-step"}),
            json!({"type": "reasoning-start", "id": "r"}),
            json!({"type": "reasoning-delta", "id": "r", "delta": "thinking"}),
            json!({"type": "reasoning-end", "id": "r"}),
            json!({"type": "text-start", "id": "t"}),
            json!({"type": "text-delta", "id": "t", "delta": "Hel"}),
            json!({"type": "text-delta", "id": "t", "delta": "lo"}),
        ]) {
            assert_eq!(acc.apply(chunk).unwrap(), ChunkOutcome::Updated);
        }

        let message = acc.message();
        assert_eq!(message.id, "srv-1");
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.text(), "Hello");
        let MessagePart::Text(text) = &message.parts[2] else {
            panic!("expected text part");
        };
        assert_eq!(text.state, Some(PartState::Streaming));

        let outcome = acc
            .apply(parse_chunk(r#"{"type":"finish","messageMetadata":{"model":"gpt-5"}}"#).unwrap())
            .unwrap();
        assert_eq!(outcome, ChunkOutcome::Finished);
        let message = acc.into_message();
        assert_eq!(message.metadata, Some(json!({"model": "gpt-5"})));
        let MessagePart::Text(text) = &message.parts[2] else {
            panic!("expected text part");
        };
        assert_eq!(text.state, Some(PartState::Done));
    }

    #[test]
    fn tool_call_lifecycle() {
        let mut acc = MessageAccumulator::new();
        for chunk in chunks(&[
            json!({"type": "tool-input-start", "toolCallId": "c1", "toolName": "web_search"}),
            json!({"type": "tool-input-delta", "toolCallId": "c1", "inputTextDelta": "{\"query\":"}),
        ]) {
            acc.apply(chunk).unwrap();
        }
        let MessagePart::Tool(tool) = &acc.message().parts[0] else {
            panic!("expected tool part");
        };
        assert_eq!(tool.state, ToolState::InputStreaming);
        assert!(tool.input.is_none());

        for chunk in chunks(&[
            json!({"type": "tool-input-delta", "toolCallId": "c1", "inputTextDelta": "\"rust\"}"}),
            json!({"type": "tool-input-available", "toolCallId": "c1", "toolName": "web_search",
                   "input": {"query": "rust"}}),
            json!({"type": "tool-output-available", "toolCallId": "c1", "output": {"hits": 3}}),
        ]) {
            acc.apply(chunk).unwrap();
        }
        let MessagePart::Tool(tool) = &acc.message().parts[0] else {
            panic!("expected tool part");
        };
        assert_eq!(tool.tool_name, "web_search");
        assert_eq!(tool.state, ToolState::OutputAvailable);
        assert_eq!(tool.input, Some(json!({"query": "rust"})));
        assert_eq!(tool.output, Some(json!({"hits": 3})));
        assert_eq!(acc.message().parts.len(), 1);

        let stored = serde_json::to_value(acc.message()).unwrap();
        assert_eq!(stored["parts"][0]["type"], "tool-web_search");
    }

    #[test]
    fn tool_input_available_without_start_creates_part() {
        let mut acc = MessageAccumulator::new();
        acc.apply(
            parse_chunk(
                r#"{"type":"tool-input-available","toolCallId":"c9","toolName":"lookup","input":{},"dynamic":true}"#,
            )
            .unwrap(),
        )
        .unwrap();
        let MessagePart::Tool(tool) = &acc.message().parts[0] else {
            panic!("expected tool part");
        };
        assert!(tool.dynamic);
        assert_eq!(tool.state, ToolState::InputAvailable);
    }

    #[test]
    fn deltas_for_unknown_ids_are_errors() {
        let mut acc = MessageAccumulator::new();
        let err = acc
            .apply(StreamChunk::TextDelta {
                id: "nope".to_string(),
                delta: "x".to_string(),
            })
            .unwrap_err();
        assert_eq!(
            err,
            StreamError::UnknownPart {
                kind: "text",
                id: "nope".to_string()
            }
        );

        let err = acc
            .apply(StreamChunk::ToolOutputError {
                tool_call_id: "c1".to_string(),
                error_text: "boom".to_string(),
            })
            .unwrap_err();
        assert_eq!(err, StreamError::UnknownToolCall("c1".to_string()));
        assert!(acc.message().parts.is_empty());
    }

    #[test]
    fn error_and_abort_end_the_response() {
        let mut acc = MessageAccumulator::new();
        acc.apply(StreamChunk::TextStart { id: "t".to_string() })
            .unwrap();
        assert_eq!(
            acc.apply(StreamChunk::Error {
                error_text: "rate limited".to_string()
            })
            .unwrap(),
            ChunkOutcome::Failed("rate limited".to_string())
        );
        let MessagePart::Text(text) = &acc.message().parts[0] else {
            panic!("expected text part");
        };
        assert_eq!(text.state, Some(PartState::Done));

        let mut acc = MessageAccumulator::new();
        assert_eq!(acc.apply(StreamChunk::Abort).unwrap(), ChunkOutcome::Aborted);
    }

    #[test]
    fn sources_and_files_become_parts() {
        let mut acc = MessageAccumulator::new();
        for chunk in chunks(&[
            json!({"type": "source-url", "sourceId": "s1", "url": "https://a.example"}),
            json!({"type": "file", "url": "data:image/png;base64,AA==", "mediaType": "image/png"}),
        ]) {
            acc.apply(chunk).unwrap();
        }
        assert_eq!(acc.message().source_urls().len(), 1);
        let MessagePart::File(file) = &acc.message().parts[1] else {
            panic!("expected file part");
        };
        assert!(file.is_image());
    }
}
