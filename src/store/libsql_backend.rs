//! libSQL backend for conversation persistence.
//!
//! Supports local file and in-memory databases. State snapshots are stored
//! as a JSON column; the message log is its own append-only table.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Connection, params};
use tracing::{debug, info};
use uuid::Uuid;

use crate::conversation::{ConversationState, Message, Role};
use crate::error::StoreError;
use crate::store::traits::ConversationStore;

/// libSQL conversation store.
///
/// Holds a single connection reused for all operations. `libsql::Connection`
/// is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlBackend {
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and initialize the schema.
    pub async fn new_local(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Open(format!("Failed to create data directory: {e}")))?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Open(format!("Failed to open database: {e}")))?;
        let conn = db
            .connect()
            .map_err(|e| StoreError::Open(format!("Failed to create connection: {e}")))?;

        let backend = Self { conn };
        backend.init_schema().await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, StoreError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| StoreError::Open(format!("Failed to create in-memory database: {e}")))?;
        let conn = db
            .connect()
            .map_err(|e| StoreError::Open(format!("Failed to create connection: {e}")))?;

        let backend = Self { conn };
        backend.init_schema().await?;
        Ok(backend)
    }

    /// Idempotent schema setup.
    async fn init_schema(&self) -> Result<(), StoreError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS conversations (
                    id TEXT PRIMARY KEY,
                    user_id TEXT NOT NULL,
                    state TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );
                CREATE TABLE IF NOT EXISTS conversation_messages (
                    id TEXT PRIMARY KEY,
                    conversation_id TEXT NOT NULL,
                    role TEXT NOT NULL,
                    content TEXT NOT NULL,
                    created_at TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_messages_conversation
                    ON conversation_messages (conversation_id, created_at);",
            )
            .await
            .map_err(|e| StoreError::Query(format!("init_schema: {e}")))?;
        Ok(())
    }
}

/// Parse an RFC 3339 timestamp, falling back to the epoch on bad data.
fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[async_trait]
impl ConversationStore for LibSqlBackend {
    async fn save_state(&self, state: &ConversationState) -> Result<(), StoreError> {
        let json = serde_json::to_string(state)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let now = Utc::now().to_rfc3339();

        self.conn
            .execute(
                "INSERT INTO conversations (id, user_id, state, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (id) DO UPDATE SET state = ?3, updated_at = ?4",
                params![state.conversation_id.to_string(), state.user_id.clone(), json, now],
            )
            .await
            .map_err(|e| StoreError::Query(format!("save_state: {e}")))?;

        debug!(conversation = %state.conversation_id, "State snapshot saved");
        Ok(())
    }

    async fn load_state(
        &self,
        conversation_id: Uuid,
    ) -> Result<Option<ConversationState>, StoreError> {
        let mut rows = self
            .conn
            .query(
                "SELECT state FROM conversations WHERE id = ?1",
                params![conversation_id.to_string()],
            )
            .await
            .map_err(|e| StoreError::Query(format!("load_state: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let json: String = row
                    .get(0)
                    .map_err(|e| StoreError::Query(format!("load_state row: {e}")))?;
                let state = serde_json::from_str(&json)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?;
                Ok(Some(state))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Query(format!("load_state: {e}"))),
        }
    }

    async fn append_message(
        &self,
        conversation_id: Uuid,
        message: &Message,
    ) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT INTO conversation_messages (id, conversation_id, role, content, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    Uuid::new_v4().to_string(),
                    conversation_id.to_string(),
                    message.role.as_str(),
                    message.content.clone(),
                    message.timestamp.to_rfc3339(),
                ],
            )
            .await
            .map_err(|e| StoreError::Query(format!("append_message: {e}")))?;
        Ok(())
    }

    async fn list_messages(
        &self,
        conversation_id: Uuid,
        limit: usize,
    ) -> Result<Vec<Message>, StoreError> {
        let mut rows = self
            .conn
            .query(
                "SELECT role, content, created_at FROM conversation_messages
                 WHERE conversation_id = ?1 ORDER BY created_at ASC LIMIT ?2",
                params![conversation_id.to_string(), limit as i64],
            )
            .await
            .map_err(|e| StoreError::Query(format!("list_messages: {e}")))?;

        let mut messages = Vec::new();
        loop {
            let row = match rows.next().await {
                Ok(Some(row)) => row,
                Ok(None) => break,
                Err(e) => return Err(StoreError::Query(format!("list_messages: {e}"))),
            };
            let role_str: String = row
                .get(0)
                .map_err(|e| StoreError::Query(format!("list_messages row: {e}")))?;
            let content: String = row
                .get(1)
                .map_err(|e| StoreError::Query(format!("list_messages row: {e}")))?;
            let created_str: String = row
                .get(2)
                .map_err(|e| StoreError::Query(format!("list_messages row: {e}")))?;
            let role = Role::parse(&role_str).ok_or_else(|| {
                StoreError::Serialization(format!("unknown message role: {role_str}"))
            })?;
            messages.push(Message {
                role,
                content,
                timestamp: parse_datetime(&created_str),
            });
        }
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::JourneyStage;

    #[tokio::test]
    async fn state_round_trips_through_the_snapshot_column() {
        let store = LibSqlBackend::new_memory().await.unwrap();
        let mut state = ConversationState::open("u1", "hello");
        state.journey_stage = JourneyStage::Exploration;
        state.goals_validated = true;

        store.save_state(&state).await.unwrap();
        let loaded = store.load_state(state.conversation_id).await.unwrap().unwrap();

        assert_eq!(loaded.conversation_id, state.conversation_id);
        assert_eq!(loaded.journey_stage, JourneyStage::Exploration);
        assert!(loaded.goals_validated);
        assert_eq!(loaded.messages.len(), 1);
    }

    #[tokio::test]
    async fn save_state_is_an_upsert() {
        let store = LibSqlBackend::new_memory().await.unwrap();
        let mut state = ConversationState::open("u1", "hello");
        store.save_state(&state).await.unwrap();

        state.goals_validated = true;
        store.save_state(&state).await.unwrap();

        let loaded = store.load_state(state.conversation_id).await.unwrap().unwrap();
        assert!(loaded.goals_validated);
    }

    #[tokio::test]
    async fn unknown_conversation_loads_as_none() {
        let store = LibSqlBackend::new_memory().await.unwrap();
        let loaded = store.load_state(Uuid::new_v4()).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn messages_list_in_order_with_limit() {
        let store = LibSqlBackend::new_memory().await.unwrap();
        let id = Uuid::new_v4();
        for i in 0..5 {
            let mut msg = Message::user(format!("message {i}"));
            // Distinct timestamps so ordering is deterministic
            msg.timestamp = Utc::now() + chrono::Duration::milliseconds(i);
            store.append_message(id, &msg).await.unwrap();
        }

        let all = store.list_messages(id, 100).await.unwrap();
        assert_eq!(all.len(), 5);
        assert_eq!(all[0].content, "message 0");
        assert_eq!(all[4].content, "message 4");

        let limited = store.list_messages(id, 2).await.unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[tokio::test]
    async fn local_file_store_creates_its_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/assist.db");
        let store = LibSqlBackend::new_local(&path).await.unwrap();

        let state = ConversationState::open("u1", "hello");
        store.save_state(&state).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn malformed_role_surfaces_an_error() {
        let store = LibSqlBackend::new_memory().await.unwrap();
        let id = Uuid::new_v4();
        store.append_message(id, &Message::user("ok")).await.unwrap();
        store
            .conn
            .execute(
                "INSERT INTO conversation_messages (id, conversation_id, role, content, created_at)
                 VALUES (?1, ?2, 'narrator', 'bad row', ?3)",
                params![
                    Uuid::new_v4().to_string(),
                    id.to_string(),
                    Utc::now().to_rfc3339(),
                ],
            )
            .await
            .unwrap();

        let err = store.list_messages(id, 10).await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[tokio::test]
    async fn roles_survive_the_round_trip() {
        let store = LibSqlBackend::new_memory().await.unwrap();
        let id = Uuid::new_v4();
        store.append_message(id, &Message::user("q")).await.unwrap();
        store
            .append_message(id, &Message::assistant("a"))
            .await
            .unwrap();

        let messages = store.list_messages(id, 10).await.unwrap();
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[1].role, Role::Assistant);
    }
}
