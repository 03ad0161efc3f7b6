//! Chat messages as rendered and persisted by the client
//!
//! The JSON shape follows the UI message format spoken by `/api/chat`, so a
//! message list can be stored verbatim and sent back on the next request.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Messages
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One chat message: a role plus an ordered list of parts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UiMessage {
    pub id: String,
    pub role: Role,
    #[serde(default)]
    pub parts: Vec<MessagePart>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl UiMessage {
    pub fn new(role: Role) -> Self {
        Self {
            id: new_message_id(),
            role,
            parts: Vec::new(),
            metadata: None,
        }
    }

    /// A user message holding a single text part
    pub fn user_text(text: impl Into<String>) -> Self {
        let mut message = Self::new(Role::User);
        message.parts.push(MessagePart::Text(TextPart::done(text)));
        message
    }

    /// Concatenated text parts, used for previews and the copy action
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                MessagePart::Text(text) => Some(text.text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// All `source-url` parts, in order
    pub fn source_urls(&self) -> Vec<&SourceUrlPart> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                MessagePart::SourceUrl(source) => Some(source),
                _ => None,
            })
            .collect()
    }
}

pub fn new_message_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

// ============================================================================
// Parts
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PartState {
    Streaming,
    Done,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ToolState {
    InputStreaming,
    InputAvailable,
    OutputAvailable,
    OutputError,
}

impl ToolState {
    pub fn label(&self) -> &'static str {
        match self {
            ToolState::InputStreaming => "Pending",
            ToolState::InputAvailable => "Running",
            ToolState::OutputAvailable => "Completed",
            ToolState::OutputError => "Error",
        }
    }
}

/// `text` and `reasoning` parts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextPart {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<PartState>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TextPart {
    pub fn streaming() -> Self {
        Self {
            text: String::new(),
            state: Some(PartState::Streaming),
            extra: Map::new(),
        }
    }

    pub fn done(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            state: Some(PartState::Done),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SourceUrlPart {
    pub source_id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SourceDocumentPart {
    pub source_id: String,
    pub media_type: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilePart {
    pub media_type: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl FilePart {
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}

/// A tool invocation. Static tools are tagged `tool-<name>`, dynamic ones
/// `dynamic-tool` with an explicit `toolName`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolPart {
    #[serde(default, skip_serializing)]
    pub tool_name: String,
    #[serde(skip)]
    pub dynamic: bool,
    pub tool_call_id: String,
    pub state: ToolState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ToolPart {
    pub fn new(
        tool_name: impl Into<String>,
        tool_call_id: impl Into<String>,
        dynamic: bool,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            dynamic,
            tool_call_id: tool_call_id.into(),
            state: ToolState::InputStreaming,
            input: None,
            output: None,
            error_text: None,
            extra: Map::new(),
        }
    }
}

/// One entry of [`UiMessage::parts`].
///
/// Part types this client does not understand are kept as [`MessagePart::Other`]
/// so that stored conversations round-trip without loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum MessagePart {
    Text(TextPart),
    Reasoning(TextPart),
    SourceUrl(SourceUrlPart),
    SourceDocument(SourceDocumentPart),
    File(FilePart),
    StepStart,
    Tool(ToolPart),
    Other(Value),
}

const TOOL_TYPE_PREFIX: &str = "tool-";
const DYNAMIC_TOOL_TYPE: &str = "dynamic-tool";

impl From<Value> for MessagePart {
    fn from(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            return MessagePart::Other(value);
        };
        let kind = match fields.get("type") {
            Some(Value::String(kind)) => kind.clone(),
            _ => return MessagePart::Other(Value::Object(fields)),
        };
        fields.remove("type");
        let body = Value::Object(fields.clone());

        let parsed = match kind.as_str() {
            "text" => serde_json::from_value(body).map(MessagePart::Text),
            "reasoning" => serde_json::from_value(body).map(MessagePart::Reasoning),
            "source-url" => serde_json::from_value(body).map(MessagePart::SourceUrl),
            "source-document" => serde_json::from_value(body).map(MessagePart::SourceDocument),
            "file" => serde_json::from_value(body).map(MessagePart::File),
            "step-start" => Ok(MessagePart::StepStart),
            DYNAMIC_TOOL_TYPE => serde_json::from_value::<ToolPart>(body).map(|mut tool| {
                tool.dynamic = true;
                tool.extra.remove("toolName");
                MessagePart::Tool(tool)
            }),
            other => match other.strip_prefix(TOOL_TYPE_PREFIX) {
                Some(name) => serde_json::from_value::<ToolPart>(body).map(|mut tool| {
                    tool.tool_name = name.to_string();
                    MessagePart::Tool(tool)
                }),
                None => return MessagePart::Other(with_type(fields, kind.clone())),
            },
        };

        match parsed {
            Ok(part) => part,
            Err(e) => {
                tracing::warn!("Keeping malformed {} part as-is: {}", kind, e);
                MessagePart::Other(with_type(fields, kind))
            }
        }
    }
}

impl From<MessagePart> for Value {
    fn from(part: MessagePart) -> Self {
        let (kind, body) = match part {
            MessagePart::Text(text) => ("text".to_string(), to_object(&text)),
            MessagePart::Reasoning(text) => ("reasoning".to_string(), to_object(&text)),
            MessagePart::SourceUrl(source) => ("source-url".to_string(), to_object(&source)),
            MessagePart::SourceDocument(source) => {
                ("source-document".to_string(), to_object(&source))
            }
            MessagePart::File(file) => ("file".to_string(), to_object(&file)),
            MessagePart::StepStart => ("step-start".to_string(), Map::new()),
            MessagePart::Tool(tool) => {
                let mut body = to_object(&tool);
                if tool.dynamic {
                    body.insert("toolName".to_string(), Value::String(tool.tool_name));
                    (DYNAMIC_TOOL_TYPE.to_string(), body)
                } else {
                    (format!("{TOOL_TYPE_PREFIX}{}", tool.tool_name), body)
                }
            }
            MessagePart::Other(value) => return value,
        };
        with_type(body, kind)
    }
}

fn with_type(fields: Map<String, Value>, kind: String) -> Value {
    let mut object = Map::with_capacity(fields.len() + 1);
    object.insert("type".to_string(), Value::String(kind));
    object.extend(fields);
    Value::Object(object)
}

fn to_object<T: Serialize>(value: &T) -> Map<String, Value> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

// ============================================================================
// Chat status
// ============================================================================

/// Lifecycle of the current request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatStatus {
    #[default]
    Ready,
    /// Request sent, nothing received yet
    Submitted,
    Streaming,
    Error,
}

impl ChatStatus {
    pub fn is_busy(&self) -> bool {
        matches!(self, ChatStatus::Submitted | ChatStatus::Streaming)
    }
}

/// Drop messages so that `message_id` can be answered again.
///
/// An assistant message is removed together with everything after it; a user
/// message is kept and only its followers are removed. Returns `false` when
/// the id is unknown.
pub fn truncate_for_regenerate(messages: &mut Vec<UiMessage>, message_id: &str) -> bool {
    let Some(index) = messages.iter().position(|m| m.id == message_id) else {
        return false;
    };
    let keep = if messages[index].role == Role::Assistant {
        index
    } else {
        index + 1
    };
    messages.truncate(keep);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assistant(id: &str, text: &str) -> UiMessage {
        UiMessage {
            id: id.to_string(),
            role: Role::Assistant,
            parts: vec![MessagePart::Text(TextPart::done(text))],
            metadata: None,
        }
    }

    #[test]
    fn parses_known_part_types() {
        let message: UiMessage = serde_json::from_value(json!({
            "id": "m1",
            "role": "assistant",
            "parts": [
                {"type": "step-start"},
                {"type": "reasoning", "text": "hmm", "state": "done"},
                {"type": "text", "text": "Hello", "state": "done"},
                {"type": "source-url", "sourceId": "s1", "url": "https://example.com"},
                {"type": "tool-web_search", "toolCallId": "c1", "state": "output-available",
                 "input": {"q": "rust"}, "output": ["r1"]},
                {"type": "dynamic-tool", "toolName": "lookup", "toolCallId": "c2",
                 "state": "output-error", "errorText": "boom"}
            ]
        }))
        .unwrap();

        assert_eq!(message.parts.len(), 6);
        assert_eq!(message.parts[0], MessagePart::StepStart);
        assert_eq!(message.text(), "Hello");
        assert_eq!(message.source_urls()[0].url, "https://example.com");

        let MessagePart::Tool(search) = &message.parts[4] else {
            panic!("expected tool part");
        };
        assert_eq!(search.tool_name, "web_search");
        assert!(!search.dynamic);
        assert_eq!(search.state, ToolState::OutputAvailable);

        let MessagePart::Tool(lookup) = &message.parts[5] else {
            panic!("expected dynamic tool part");
        };
        assert_eq!(lookup.tool_name, "lookup");
        assert!(lookup.dynamic);
        assert_eq!(lookup.error_text.as_deref(), Some("boom"));
    }

    #[test]
    fn tool_parts_keep_their_type_tag_when_stored() {
        let raw = json!({"type": "tool-code_execution", "toolCallId": "c1",
                         "state": "input-available", "input": {"code": "1+1"},
                         "providerExecuted": true});
        let part: MessagePart = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&part).unwrap(), raw);

        let dynamic = json!({"type": "dynamic-tool", "toolName": "x", "toolCallId": "c2",
                             "state": "input-streaming"});
        let part: MessagePart = serde_json::from_value(dynamic.clone()).unwrap();
        assert_eq!(serde_json::to_value(&part).unwrap(), dynamic);
    }

    #[test]
    fn built_in_parts_serialize_with_their_type_tag() {
        assert_eq!(
            Value::from(MessagePart::Text(TextPart::done("hi"))),
            json!({"type": "text", "text": "hi", "state": "done"})
        );
        assert_eq!(
            Value::from(MessagePart::Reasoning(TextPart::streaming())),
            json!({"type": "reasoning", "text": "", "state": "streaming"})
        );
        assert_eq!(Value::from(MessagePart::StepStart), json!({"type": "step-start"}));
    }

    #[test]
    fn unknown_and_malformed_parts_are_preserved() {
        let custom = json!({"type": "data-weather", "data": {"temp": 21}});
        let part: MessagePart = serde_json::from_value(custom.clone()).unwrap();
        assert!(matches!(part, MessagePart::Other(_)));
        assert_eq!(serde_json::to_value(&part).unwrap(), custom);

        let broken = json!({"type": "text", "text": 42});
        let part: MessagePart = serde_json::from_value(broken.clone()).unwrap();
        assert!(matches!(part, MessagePart::Other(_)));
        assert_eq!(serde_json::to_value(&part).unwrap(), broken);
    }

    #[test]
    fn user_text_builds_single_text_part() {
        let message = UiMessage::user_text("hi there");
        assert_eq!(message.role, Role::User);
        assert_eq!(message.text(), "hi there");
        assert!(!message.id.is_empty());

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["parts"][0]["type"], "text");
        assert!(json.get("metadata").is_none());
    }

    #[test]
    fn regenerate_drops_assistant_message_and_followers() {
        let mut messages = vec![
            UiMessage::user_text("q1"),
            assistant("a1", "r1"),
            UiMessage::user_text("q2"),
            assistant("a2", "r2"),
        ];
        assert!(truncate_for_regenerate(&mut messages, "a1"));
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::User);
    }

    #[test]
    fn regenerate_from_user_message_keeps_it() {
        let question = UiMessage::user_text("q1");
        let question_id = question.id.clone();
        let mut messages = vec![question, assistant("a1", "r1")];

        assert!(truncate_for_regenerate(&mut messages, &question_id));
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, question_id);

        assert!(!truncate_for_regenerate(&mut messages, "missing"));
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn busy_statuses() {
        assert!(ChatStatus::Submitted.is_busy());
        assert!(ChatStatus::Streaming.is_busy());
        assert!(!ChatStatus::Ready.is_busy());
        assert!(!ChatStatus::Error.is_busy());
    }
}
