//! Assistant service — the composition root shared by every channel.
//!
//! Owns the workflow plus an in-memory session cache hydrated lazily from
//! the store, so a conversation survives a restart without the channels
//! knowing anything about persistence.
//!
//! Concurrency: the cache map is locked only for lookup and insert; each
//! session carries its own mutex, held for the duration of a turn. Turns on
//! the same conversation are serialized, turns on distinct conversations
//! run concurrently.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::AssistantConfig;
use crate::conversation::{ConversationState, Message};
use crate::error::{Error, StoreError};
use crate::specialists::ResponseMetadata;
use crate::store::ConversationStore;
use crate::workflow::{Workflow, WorkflowState};

type SharedSession = Arc<Mutex<ConversationState>>;

/// One turn's outcome as seen by a channel.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub conversation_id: Uuid,
    pub content: String,
    pub specialist: String,
    pub metadata: ResponseMetadata,
    pub workflow_state: WorkflowState,
}

pub struct Assistant {
    config: AssistantConfig,
    workflow: Workflow,
    store: Option<Arc<dyn ConversationStore>>,
    sessions: Mutex<HashMap<Uuid, SharedSession>>,
}

impl Assistant {
    pub fn new(
        config: AssistantConfig,
        workflow: Workflow,
        store: Option<Arc<dyn ConversationStore>>,
    ) -> Self {
        Self {
            config,
            workflow,
            store,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Run one turn. A missing or unknown `conversation_id` starts a new
    /// conversation; the reply carries the id to use for follow-ups.
    pub async fn chat(
        &self,
        user_id: &str,
        conversation_id: Option<Uuid>,
        message: &str,
    ) -> ChatReply {
        let session = self.resolve_session(user_id, conversation_id, message).await;
        let mut state = session.lock().await;
        let reply = self.workflow.process_turn(&mut state, message).await;

        ChatReply {
            conversation_id: state.conversation_id,
            content: reply.content,
            specialist: reply.specialist,
            metadata: reply.metadata,
            workflow_state: reply.workflow_state,
        }
    }

    /// Find or create the session for this turn. The cache map lock is
    /// never held across the turn itself.
    async fn resolve_session(
        &self,
        user_id: &str,
        conversation_id: Option<Uuid>,
        message: &str,
    ) -> SharedSession {
        if let Some(id) = conversation_id {
            if let Some(session) = self.sessions.lock().await.get(&id) {
                return Arc::clone(session);
            }
            if let Some(state) = self.hydrate(id).await {
                let mut sessions = self.sessions.lock().await;
                // A concurrent hydration may have won; keep whichever landed.
                return Arc::clone(
                    sessions
                        .entry(id)
                        .or_insert_with(|| Arc::new(Mutex::new(state))),
                );
            }
            tracing::debug!(conversation = %id, "Unknown conversation id, starting fresh");
        }

        let state = ConversationState::open(user_id, message);
        let id = state.conversation_id;
        let session = Arc::new(Mutex::new(state));
        self.sessions.lock().await.insert(id, Arc::clone(&session));
        session
    }

    /// Message history for a conversation, oldest first.
    ///
    /// Served from the live session when one exists, otherwise from the
    /// store (so history outlives a restart).
    pub async fn history(&self, conversation_id: Uuid) -> Result<Vec<Message>, Error> {
        let limit = self.config.history_limit;

        let session = {
            let sessions = self.sessions.lock().await;
            sessions.get(&conversation_id).map(Arc::clone)
        };
        if let Some(session) = session {
            let state = session.lock().await;
            return Ok(state.messages.iter().take(limit).cloned().collect());
        }

        match self.store.as_ref() {
            Some(store) => Ok(store.list_messages(conversation_id, limit).await?),
            None => Err(Error::Store(StoreError::NotFound(conversation_id))),
        }
    }

    async fn hydrate(&self, conversation_id: Uuid) -> Option<ConversationState> {
        let store = self.store.as_ref()?;
        match store.load_state(conversation_id).await {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(
                    conversation = %conversation_id,
                    error = %e,
                    "Failed to hydrate conversation from store"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpecialistError;
    use crate::router::{KeywordRouter, SpecialistId};
    use crate::specialists::{
        Specialist, SpecialistRegistry, SpecialistRequest, SpecialistResponse,
    };
    use crate::tools::LookupRegistry;
    use crate::workflow::{WorkflowConfig, WorkflowDeps};
    use async_trait::async_trait;
    use std::time::{Duration, Instant};

    fn assistant(store: Option<Arc<dyn ConversationStore>>) -> Assistant {
        let config = AssistantConfig::default();
        let tools = Arc::new(LookupRegistry::with_builtins());
        let workflow = Workflow::new(
            WorkflowConfig::new(config.quit_token.clone(), config.interrupt_before.clone()),
            WorkflowDeps {
                store: store.clone(),
                specialists: Arc::new(SpecialistRegistry::with_defaults(tools, None)),
                classifier: Box::new(KeywordRouter::new()),
            },
        );
        Assistant::new(config, workflow, store)
    }

    /// Sleeps before answering, to make turn overlap observable.
    struct SlowSpecialist {
        id: SpecialistId,
        delay: Duration,
    }

    #[async_trait]
    impl Specialist for SlowSpecialist {
        fn id(&self) -> SpecialistId {
            self.id
        }
        async fn respond(
            &self,
            _request: &SpecialistRequest,
        ) -> Result<SpecialistResponse, SpecialistError> {
            tokio::time::sleep(self.delay).await;
            Ok(SpecialistResponse {
                content: "slow reply".into(),
                metadata: ResponseMetadata::for_specialist(self.id, 0.5),
            })
        }
    }

    fn slow_assistant(delay: Duration) -> Assistant {
        let config = AssistantConfig::default();
        let mut registry = SpecialistRegistry::new();
        registry.register(Arc::new(SlowSpecialist {
            id: SpecialistId::General,
            delay,
        }));
        let workflow = Workflow::new(
            WorkflowConfig::default(),
            WorkflowDeps {
                store: None,
                specialists: Arc::new(registry),
                classifier: Box::new(KeywordRouter::new()),
            },
        );
        Assistant::new(config, workflow, None)
    }

    #[tokio::test]
    async fn chat_without_an_id_opens_a_conversation() {
        let assistant = assistant(None);
        let reply = assistant
            .chat("u1", None, "I'm a veteran looking for work")
            .await;
        assert_eq!(reply.specialist, "veteran");
        assert!(!reply.content.is_empty());
    }

    #[tokio::test]
    async fn follow_up_turns_share_the_conversation() {
        let assistant = assistant(None);
        let first = assistant.chat("u1", None, "hello").await;
        let second = assistant
            .chat("u1", Some(first.conversation_id), "tell me more about options")
            .await;
        assert_eq!(second.conversation_id, first.conversation_id);

        let history = assistant.history(first.conversation_id).await.unwrap();
        // Two turns: opening + reply, follow-up + reply
        assert_eq!(history.len(), 4);
    }

    #[tokio::test]
    async fn independent_conversations_run_concurrently() {
        let delay = Duration::from_millis(250);
        let assistant = slow_assistant(delay);

        let start = Instant::now();
        let (a, b) = tokio::join!(
            assistant.chat("u1", None, "hello"),
            assistant.chat("u2", None, "hi there"),
        );
        let elapsed = start.elapsed();

        assert_ne!(a.conversation_id, b.conversation_id);
        // Two overlapping 250ms turns finish well under the 500ms a
        // serialized run would need.
        assert!(
            elapsed < Duration::from_millis(450),
            "independent turns did not overlap: took {elapsed:?}"
        );
    }

    #[tokio::test]
    async fn same_conversation_turns_are_serialized() {
        let assistant = slow_assistant(Duration::from_millis(20));
        let first = assistant.chat("u1", None, "hello").await;
        let id = first.conversation_id;

        let (a, b) = tokio::join!(
            assistant.chat("u1", Some(id), "one"),
            assistant.chat("u1", Some(id), "two"),
        );
        assert_eq!(a.conversation_id, id);
        assert_eq!(b.conversation_id, id);

        // No lost update: three full turns, six messages.
        let history = assistant.history(id).await.unwrap();
        assert_eq!(history.len(), 6);
    }

    #[tokio::test]
    async fn history_without_a_store_errors_for_unknown_conversations() {
        let assistant = assistant(None);
        assert!(assistant.history(Uuid::new_v4()).await.is_err());
    }

    #[tokio::test]
    async fn unknown_id_starts_a_new_conversation() {
        let assistant = assistant(None);
        let requested = Uuid::new_v4();
        let reply = assistant.chat("u1", Some(requested), "hello").await;
        assert_ne!(reply.conversation_id, requested);
    }
}
