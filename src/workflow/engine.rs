//! Turn engine — drives one conversation turn through the state machine.
//!
//! Exactly one assistant message is appended per invocation on every path:
//! normal dispatch, review pause, quit sentinel, closed session, and error.
//! The message log never shrinks.

use std::sync::Arc;

use crate::conversation::{ConversationState, JourneyStage, Message};
use crate::error::WorkflowError;
use crate::router::{MessageClassifier, SpecialistId};
use crate::specialists::{ResponseMetadata, SpecialistRegistry, SpecialistRequest};
use crate::store::ConversationStore;
use crate::workflow::state::WorkflowState;

/// Acknowledgement appended when dispatch pauses for human review.
const REVIEW_PAUSE_NOTICE: &str = "I'd like a human advisor to take a quick look before I \
     respond. Send another message to continue, or type \"quit\" to end the session.";

/// Acknowledgement appended when the quit sentinel ends the session.
const SESSION_END_NOTICE: &str =
    "Thanks for stopping by — your progress is saved. Come back any time.";

/// Notice appended when a message arrives on a closed session.
const SESSION_CLOSED_NOTICE: &str =
    "This session has ended. Start a new conversation to continue.";

/// Per-workflow behavior knobs.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Sentinel that ends the session while awaiting input.
    pub quit_token: String,
    /// Specialists whose dispatch pauses for human review first.
    pub interrupt_before: Vec<SpecialistId>,
}

impl WorkflowConfig {
    pub fn new(quit_token: impl Into<String>, interrupt_before: Vec<SpecialistId>) -> Self {
        Self {
            quit_token: quit_token.into(),
            interrupt_before,
        }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self::new("quit", Vec::new())
    }
}

/// Dependencies injected into the workflow at startup.
pub struct WorkflowDeps {
    /// Persistence is optional: turns run fine in memory-only mode.
    pub store: Option<Arc<dyn ConversationStore>>,
    pub specialists: Arc<SpecialistRegistry>,
    pub classifier: Box<dyn MessageClassifier>,
}

/// Result of one turn, returned to the channel layer.
#[derive(Debug, Clone)]
pub struct TurnReply {
    pub content: String,
    /// Specialist tag from the response metadata ("fallback_system" on the
    /// fallback path, "system" for pause/termination notices).
    pub specialist: String,
    pub metadata: ResponseMetadata,
    pub workflow_state: WorkflowState,
}

impl TurnReply {
    fn system_notice(content: &str, state: WorkflowState) -> Self {
        Self {
            content: content.to_string(),
            specialist: "system".to_string(),
            metadata: ResponseMetadata {
                specialist: "system".to_string(),
                tools_used: Vec::new(),
                confidence: 1.0,
                sources: Vec::new(),
            },
            workflow_state: state,
        }
    }
}

/// The workflow — routes a message, dispatches a specialist, and updates
/// conversation state, absorbing every failure at this boundary.
pub struct Workflow {
    config: WorkflowConfig,
    deps: WorkflowDeps,
}

impl Workflow {
    pub fn new(config: WorkflowConfig, deps: WorkflowDeps) -> Self {
        Self { config, deps }
    }

    fn is_quit(&self, message: &str) -> bool {
        let token = self.config.quit_token.trim();
        !token.is_empty() && message.trim().eq_ignore_ascii_case(token)
    }

    /// Process one turn for `state` with the new inbound `message`.
    ///
    /// State is mutated in place; the caller owns persistence of the final
    /// state (the turn itself fire-and-forgets the message log when a store
    /// is configured).
    pub async fn process_turn(&self, state: &mut ConversationState, message: &str) -> TurnReply {
        let entry_len = state.messages.len();

        // A closed session accepts no further dispatch.
        if state.session_closed {
            state.push_message(Message::user(message));
            state.push_message(Message::assistant(SESSION_CLOSED_NOTICE));
            self.persist_turn(state, entry_len);
            return TurnReply::system_notice(SESSION_CLOSED_NOTICE, state.workflow_state);
        }

        // Human-in-the-loop gate: resume or terminate.
        let resumed_from_pause = if state.awaiting_user_input {
            if self.is_quit(message) {
                state.push_message(Message::user(message));
                state.push_message(Message::assistant(SESSION_END_NOTICE));
                state.awaiting_user_input = false;
                state.session_closed = true;
                transition(state, WorkflowState::Completed);
                tracing::info!(conversation = %state.conversation_id, "Session ended by quit token");
                self.persist_turn(state, entry_len);
                return TurnReply::system_notice(SESSION_END_NOTICE, WorkflowState::Completed);
            }
            state.awaiting_user_input = false;
            true
        } else {
            false
        };

        transition(state, WorkflowState::Processing);

        // First turn reuses the opening message recorded by `open`;
        // later turns append the new inbound message.
        let is_opening = state.messages.len() == 1
            && state.messages[0].content == message
            && state.current_specialist.is_none();
        if !is_opening {
            state.push_message(Message::user(message));
        }

        // Route. The classifier is pure and infallible.
        let specialist_id = self.deps.classifier.classify(message);
        tracing::debug!(
            conversation = %state.conversation_id,
            specialist = %specialist_id,
            "Message routed"
        );

        // Interrupt-before gate: pause instead of dispatching. A message
        // that just passed the gate is not paused again.
        if !resumed_from_pause && self.config.interrupt_before.contains(&specialist_id) {
            state.awaiting_user_input = true;
            transition(state, WorkflowState::AwaitingInput);
            state.push_message(Message::assistant(REVIEW_PAUSE_NOTICE));
            tracing::info!(
                conversation = %state.conversation_id,
                specialist = %specialist_id,
                "Paused for human review"
            );
            self.persist_turn(state, entry_len);
            return TurnReply::system_notice(REVIEW_PAUSE_NOTICE, WorkflowState::AwaitingInput);
        }

        // Dispatch. The registry never fails; a fallback response here is
        // the workflow boundary for anything that went wrong below it.
        let request = SpecialistRequest {
            message: message.to_string(),
            user_id: state.user_id.clone(),
            conversation_id: Some(state.conversation_id),
        };
        let outcome = self.deps.specialists.dispatch(specialist_id, &request).await;
        let response = outcome.response;

        if response.is_fallback() {
            transition(state, WorkflowState::Error);
            state.last_error = Some(outcome.failure.unwrap_or_else(|| {
                format!("specialist {specialist_id} returned its fallback response")
            }));
        } else {
            // Post-processing: stage and goal heuristics.
            transition(state, WorkflowState::Analyzing);
            if let Some(suggested) = JourneyStage::infer_from_message(message) {
                state.advance_stage(suggested);
            }
            if is_goal_affirmation(message) && state.current_specialist.is_some() {
                state.goals_validated = true;
            }
            state.current_specialist = Some(specialist_id);
            state.last_error = None;
            transition(state, WorkflowState::Completed);
        }
        debug_assert!(state.workflow_state.is_settled());

        state.push_message(Message::assistant(response.content.clone()));
        self.persist_turn(state, entry_len);

        TurnReply {
            content: response.content,
            specialist: response.metadata.specialist.clone(),
            metadata: response.metadata,
            workflow_state: state.workflow_state,
        }
    }

    /// Fire-and-forget: persist the messages this turn appended, plus the
    /// updated state snapshot (last-writer-wins).
    fn persist_turn(&self, state: &ConversationState, entry_len: usize) {
        let Some(store) = self.deps.store.as_ref().map(Arc::clone) else {
            return;
        };

        // The opening message recorded by `open` has never been persisted,
        // so the first turn saves from the start of the log.
        let from = if entry_len <= 1 { 0 } else { entry_len };
        let new_messages: Vec<Message> = state.messages[from..].to_vec();

        let snapshot = state.clone();
        tokio::spawn(async move {
            if let Err(e) = store.save_state(&snapshot).await {
                tracing::warn!(
                    conversation = %snapshot.conversation_id,
                    error = %e,
                    "Failed to persist conversation state"
                );
                return;
            }
            for message in &new_messages {
                if let Err(e) = store
                    .append_message(snapshot.conversation_id, message)
                    .await
                {
                    tracing::warn!(
                        conversation = %snapshot.conversation_id,
                        error = %e,
                        "Failed to persist message"
                    );
                    return;
                }
            }
        });
    }
}

/// Checked state assignment. Every edge the engine takes must be in the
/// transition table; one outside it is a bug in the engine.
fn transition(state: &mut ConversationState, to: WorkflowState) {
    let from = state.workflow_state;
    if !from.can_transition_to(to) {
        let err = WorkflowError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        };
        debug_assert!(false, "{err}");
        tracing::error!(
            conversation = %state.conversation_id,
            error = %err,
            "Workflow transition outside the table"
        );
    }
    state.workflow_state = to;
}

/// Weak affirmation heuristic used for the goals-validated flag.
fn is_goal_affirmation(message: &str) -> bool {
    const AFFIRMATIONS: &[&str] = &[
        "yes",
        "that's right",
        "thats right",
        "sounds good",
        "exactly",
        "correct",
        "that works",
    ];
    let lowered = message.trim().to_lowercase();
    AFFIRMATIONS
        .iter()
        .any(|a| lowered == *a || lowered.starts_with(&format!("{a},")) || lowered.starts_with(&format!("{a}.")))
}
