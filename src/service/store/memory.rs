use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ConversationStore, StoreError};
use crate::entities::{conversation_title, Conversation, Role, StoredMessage};

#[derive(Default)]
struct StoreState {
    conversations: HashMap<Uuid, Conversation>,
    messages: HashMap<Uuid, Vec<StoredMessage>>,
}

/// Process-local conversation store.
#[derive(Clone, Default)]
pub struct InMemoryConversationStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn create_conversation(
        &self,
        first_message: Option<String>,
    ) -> Result<Conversation, StoreError> {
        let now = Utc::now();
        let conversation = Conversation {
            id: Uuid::new_v4(),
            title: conversation_title(first_message.as_deref()),
            created_at: now,
            updated_at: now,
        };

        let mut state = self.state.write().await;
        state.conversations.insert(conversation.id, conversation.clone());
        state.messages.insert(conversation.id, Vec::new());
        log::debug!("Created conversation {} ({})", conversation.id, conversation.title);
        Ok(conversation)
    }

    async fn list_conversations(&self) -> Result<Vec<Conversation>, StoreError> {
        let state = self.state.read().await;
        let mut conversations: Vec<Conversation> = state.conversations.values().cloned().collect();
        conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(conversations)
    }

    async fn load_messages(&self, conversation_id: Uuid) -> Result<Vec<StoredMessage>, StoreError> {
        let state = self.state.read().await;
        state.messages.get(&conversation_id).cloned().ok_or(StoreError::NotFound(conversation_id))
    }

    async fn save_message(
        &self,
        conversation_id: Uuid,
        role: Role,
        content: String,
    ) -> Result<StoredMessage, StoreError> {
        let now = Utc::now();
        let mut state = self.state.write().await;
        let conversation = state
            .conversations
            .get_mut(&conversation_id)
            .ok_or(StoreError::NotFound(conversation_id))?;
        conversation.updated_at = now;

        let message =
            StoredMessage { id: Uuid::new_v4(), conversation_id, role, content, created_at: now };
        state.messages.entry(conversation_id).or_default().push(message.clone());
        Ok(message)
    }

    async fn delete_conversation(&self, conversation_id: Uuid) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.conversations.remove(&conversation_id).ok_or(StoreError::NotFound(conversation_id))?;
        state.messages.remove(&conversation_id);
        Ok(())
    }
}
