use serde::{Deserialize, Serialize};

// ─── Request ──────────────────────────────────────────────────────────────

/// Body of `POST /v1/messages`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<RequestMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

impl MessagesRequest {
    /// A single-turn request carrying one user message.
    pub fn user(model: impl Into<String>, max_tokens: u32, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            messages: vec![RequestMessage {
                role: Role::User,
                content: prompt.into(),
            }],
            system: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RequestMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

// ─── Response ─────────────────────────────────────────────────────────────

/// The `Message` object returned by the Messages API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MessagesResponse {
    pub id: String,
    pub model: String,
    #[serde(default)]
    pub role: Option<String>,
    pub content: Vec<ContentBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
    pub usage: Usage,
}

impl MessagesResponse {
    /// Text of the first content block, if that block is a `text` block.
    pub fn first_text(&self) -> Option<&str> {
        match self.content.first() {
            Some(ContentBlock::Text { text }) => Some(text),
            _ => None,
        }
    }
}

/// Content blocks within an assistant response.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        /// Tool inputs are schema-polymorphic (varies per tool), so Value is correct here.
        input: serde_json::Value,
    },
    Thinking {
        thinking: String,
    },
    /// Any block type this client does not model.
    #[serde(other)]
    Unknown,
}

impl ContentBlock {
    pub fn kind(&self) -> &'static str {
        match self {
            ContentBlock::Text { .. } => "text",
            ContentBlock::ToolUse { .. } => "tool_use",
            ContentBlock::Thinking { .. } => "thinking",
            ContentBlock::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_creation_input_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_read_input_tokens: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_text_response() {
        let json = r#"{
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "model": "claude-sonnet-4-5",
            "content": [{"type": "text", "text": "hello"}],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 12, "output_tokens": 3}
        }"#;
        let resp: MessagesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.first_text(), Some("hello"));
        assert_eq!(resp.usage.input_tokens, 12);
        assert_eq!(resp.usage.output_tokens, 3);
        assert!(resp.usage.cache_read_input_tokens.is_none());
    }

    #[test]
    fn unknown_block_type_is_tolerated() {
        let json = r#"{
            "id": "msg_02",
            "model": "claude-sonnet-4-5",
            "content": [{"type": "redacted_thinking", "data": "xyz"}],
            "usage": {"input_tokens": 1, "output_tokens": 1}
        }"#;
        let resp: MessagesResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(resp.content[0], ContentBlock::Unknown));
        assert_eq!(resp.first_text(), None);
    }

    #[test]
    fn first_text_requires_text_in_first_position() {
        let json = r#"{
            "id": "msg_03",
            "model": "claude-sonnet-4-5",
            "content": [
                {"type": "tool_use", "id": "t1", "name": "lookup", "input": {}},
                {"type": "text", "text": "later"}
            ],
            "usage": {"input_tokens": 1, "output_tokens": 1}
        }"#;
        let resp: MessagesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.content[0].kind(), "tool_use");
        assert_eq!(resp.first_text(), None);
    }

    #[test]
    fn request_serializes_without_optional_fields() {
        let req = MessagesRequest::user("claude-sonnet-4-5", 1024, "hi");
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["model"], "claude-sonnet-4-5");
        assert_eq!(value["max_tokens"], 1024);
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "hi");
        assert!(value.get("system").is_none());
    }
}
