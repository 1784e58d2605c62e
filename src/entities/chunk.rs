use serde::{Deserialize, Serialize};

use super::message::Message;

/// Body accepted by the relay endpoint: the full prior conversation,
/// without the system prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayRequest {
    pub messages: Vec<Message>,
}

/// Streaming chat-completion request sent to the upstream gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub stream: bool,
}

/// One `data:` payload of a streamed chat completion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamChunk {
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamChoice {
    #[serde(default)]
    pub delta: Delta,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Delta {
    #[serde(default)]
    pub content: Option<String>,
}

impl StreamChunk {
    /// Chunk carrying a single content fragment.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self { choices: vec![StreamChoice { delta: Delta { content: Some(content.into()) } }] }
    }

    /// `choices[0].delta.content`, when present and non-empty.
    pub fn content(&self) -> Option<&str> {
        self.choices.first()?.delta.content.as_deref().filter(|c| !c.is_empty())
    }
}
