//! Remote model/tool configuration and the `/api/chat` request body

use serde::{Deserialize, Serialize};

use crate::message::UiMessage;

/// A selectable model as returned by `/api/configure`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    pub id: String,
    pub name: String,
    /// Ids of the built-in tools this model supports
    #[serde(default)]
    pub builtin_tools: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuiltinTool {
    pub id: String,
    pub name: String,
}

/// Response of `GET /api/configure`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConfig {
    #[serde(default)]
    pub models: Vec<ModelConfig>,
    #[serde(default)]
    pub builtin_tools: Vec<BuiltinTool>,
}

impl RemoteConfig {
    pub fn default_model(&self) -> Option<&ModelConfig> {
        self.models.first()
    }

    pub fn model(&self, model_id: &str) -> Option<&ModelConfig> {
        self.models.iter().find(|model| model.id == model_id)
    }

    /// Built-in tools offered for `model_id`, in `builtinTools` order
    pub fn available_tools(&self, model_id: &str) -> Vec<BuiltinTool> {
        let Some(model) = self.model(model_id) else {
            return Vec::new();
        };
        self.builtin_tools
            .iter()
            .filter(|tool| model.builtin_tools.contains(&tool.id))
            .cloned()
            .collect()
    }

    /// The subset of `enabled` that `model_id` actually supports
    pub fn effective_tools(&self, model_id: &str, enabled: &[String]) -> Vec<String> {
        self.available_tools(model_id)
            .into_iter()
            .map(|tool| tool.id)
            .filter(|id| enabled.contains(id))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ChatTrigger {
    SubmitMessage,
    RegenerateMessage,
}

/// Body of `POST /api/chat`
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Conversation id without the leading slash
    pub id: String,
    pub messages: Vec<UiMessage>,
    pub trigger: ChatTrigger,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    pub model: String,
    pub builtin_tools: Vec<String>,
    pub web_search: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> RemoteConfig {
        serde_json::from_value(json!({
            "models": [
                {"id": "openai:gpt-4.1", "name": "GPT 4.1", "builtin_tools": ["web_search"]},
                {"id": "openai:gpt-5", "name": "GPT 5",
                 "builtin_tools": ["code_execution", "web_search"]}
            ],
            "builtinTools": [
                {"id": "web_search", "name": "Web Search"},
                {"id": "code_execution", "name": "Code Execution"},
                {"id": "image_generation", "name": "Image Generation"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn first_model_is_default() {
        assert_eq!(sample().default_model().unwrap().id, "openai:gpt-4.1");
        assert!(RemoteConfig::default().default_model().is_none());
    }

    #[test]
    fn available_tools_follow_builtin_tool_order() {
        let config = sample();
        let ids: Vec<_> = config
            .available_tools("openai:gpt-5")
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["web_search", "code_execution"]);
        assert!(config.available_tools("unknown").is_empty());
    }

    #[test]
    fn unsupported_enabled_tools_are_not_sent() {
        let config = sample();
        let enabled = vec!["code_execution".to_string(), "web_search".to_string()];
        assert_eq!(
            config.effective_tools("openai:gpt-4.1", &enabled),
            vec!["web_search".to_string()]
        );
    }

    #[test]
    fn missing_arrays_default_to_empty() {
        let config: RemoteConfig = serde_json::from_value(json!({
            "models": [{"id": "m", "name": "M"}],
            "buttons": [{"label": "Search", "action": "search"}]
        }))
        .unwrap();
        assert!(config.builtin_tools.is_empty());
        assert!(config.available_tools("m").is_empty());
    }

    #[test]
    fn request_body_uses_wire_names() {
        let request = ChatRequest {
            id: "abc".to_string(),
            messages: Vec::new(),
            trigger: ChatTrigger::RegenerateMessage,
            message_id: Some("m1".to_string()),
            model: "openai:gpt-5".to_string(),
            builtin_tools: vec!["web_search".to_string()],
            web_search: true,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["trigger"], "regenerate-message");
        assert_eq!(json["messageId"], "m1");
        assert_eq!(json["builtinTools"][0], "web_search");
        assert_eq!(json["webSearch"], true);
    }
}
