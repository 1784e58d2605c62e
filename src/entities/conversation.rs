use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::message::{Message, Role};

const TITLE_MAX_CHARS: usize = 50;
const DEFAULT_TITLE: &str = "New Conversation";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<StoredMessage> for Message {
    fn from(stored: StoredMessage) -> Self {
        Message { role: stored.role, content: stored.content }
    }
}

/// Title for a new conversation: the first 50 characters of the opening
/// message, with `...` appended when it was cut.
pub fn conversation_title(first_message: Option<&str>) -> String {
    match first_message {
        Some(text) if !text.trim().is_empty() => {
            let mut title: String = text.chars().take(TITLE_MAX_CHARS).collect();
            if text.chars().count() > TITLE_MAX_CHARS {
                title.push_str("...");
            }
            title
        }
        _ => DEFAULT_TITLE.to_string(),
    }
}
