//! Conversation persistence seam.
//!
//! The relay never touches storage; chat sessions persist their turns
//! through a [`ConversationStore`].

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::entities::{Conversation, Role, StoredMessage};

pub use memory::InMemoryConversationStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Conversation not found: {0}")]
    NotFound(Uuid),
    #[error("Store backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Creates a conversation titled after `first_message`.
    async fn create_conversation(
        &self,
        first_message: Option<String>,
    ) -> Result<Conversation, StoreError>;

    /// All conversations, most recently updated first.
    async fn list_conversations(&self) -> Result<Vec<Conversation>, StoreError>;

    /// Messages of one conversation, oldest first.
    async fn load_messages(&self, conversation_id: Uuid) -> Result<Vec<StoredMessage>, StoreError>;

    async fn save_message(
        &self,
        conversation_id: Uuid,
        role: Role,
        content: String,
    ) -> Result<StoredMessage, StoreError>;

    /// Deletes a conversation together with its messages.
    async fn delete_conversation(&self, conversation_id: Uuid) -> Result<(), StoreError>;
}
