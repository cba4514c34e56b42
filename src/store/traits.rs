//! Backend-agnostic conversation persistence trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::conversation::{ConversationState, Message};
use crate::error::StoreError;

/// Async persistence interface for conversation state and message logs.
///
/// The state snapshot is stored whole (last writer wins); messages are
/// append-only rows so history survives even if a snapshot write is lost.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Insert or replace the full state snapshot for a conversation.
    async fn save_state(&self, state: &ConversationState) -> Result<(), StoreError>;

    /// Load a conversation's state snapshot, if one exists.
    async fn load_state(&self, conversation_id: Uuid)
        -> Result<Option<ConversationState>, StoreError>;

    /// Append one message to a conversation's log.
    async fn append_message(
        &self,
        conversation_id: Uuid,
        message: &Message,
    ) -> Result<(), StoreError>;

    /// List a conversation's messages, oldest first, up to `limit`.
    async fn list_messages(
        &self,
        conversation_id: Uuid,
        limit: usize,
    ) -> Result<Vec<Message>, StoreError>;
}
