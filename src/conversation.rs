//! Conversation data model — messages, journey stages, and per-conversation state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::router::SpecialistId;
use crate::workflow::WorkflowState;

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single role-tagged entry in a conversation. Append-only once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

/// Coarse label for where the user is in the advisory flow.
///
/// Progresses linearly: Discovery → Exploration → SkillAssessment →
/// PathwaySelection → ActionPlanning → Implementation. Transitions are
/// forward-only; a keyword re-match against an earlier stage is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JourneyStage {
    Discovery,
    Exploration,
    SkillAssessment,
    PathwaySelection,
    ActionPlanning,
    Implementation,
}

impl JourneyStage {
    /// Position in the fixed stage order, used for the forward-only check.
    fn ordinal(&self) -> u8 {
        match self {
            Self::Discovery => 0,
            Self::Exploration => 1,
            Self::SkillAssessment => 2,
            Self::PathwaySelection => 3,
            Self::ActionPlanning => 4,
            Self::Implementation => 5,
        }
    }

    /// Get the next stage in the linear progression, if any.
    pub fn next(&self) -> Option<JourneyStage> {
        match self {
            Self::Discovery => Some(Self::Exploration),
            Self::Exploration => Some(Self::SkillAssessment),
            Self::SkillAssessment => Some(Self::PathwaySelection),
            Self::PathwaySelection => Some(Self::ActionPlanning),
            Self::ActionPlanning => Some(Self::Implementation),
            Self::Implementation => None,
        }
    }

    /// Whether `self` comes strictly later than `other` in the stage order.
    pub fn is_later_than(&self, other: JourneyStage) -> bool {
        self.ordinal() > other.ordinal()
    }

    /// Weak keyword heuristic: guess a stage from the latest user message.
    ///
    /// Returns `None` when nothing matches. The caller applies the
    /// forward-only policy; this function only suggests.
    pub fn infer_from_message(message: &str) -> Option<JourneyStage> {
        let lowered = message.to_lowercase();
        const STAGE_KEYWORDS: &[(JourneyStage, &[&str])] = &[
            (
                JourneyStage::Implementation,
                &["applied", "interview", "start date", "accepted an offer"],
            ),
            (
                JourneyStage::ActionPlanning,
                &["plan", "next steps", "timeline", "roadmap"],
            ),
            (
                JourneyStage::PathwaySelection,
                &["decide", "choose", "which path", "narrow down"],
            ),
            (
                JourneyStage::SkillAssessment,
                &["my skills", "qualified", "certification", "training"],
            ),
            (
                JourneyStage::Exploration,
                &["tell me more", "what kinds", "options", "explore"],
            ),
        ];
        for (stage, keywords) in STAGE_KEYWORDS {
            if keywords.iter().any(|kw| lowered.contains(kw)) {
                return Some(*stage);
            }
        }
        None
    }
}

impl Default for JourneyStage {
    fn default() -> Self {
        Self::Discovery
    }
}

impl std::fmt::Display for JourneyStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Discovery => "discovery",
            Self::Exploration => "exploration",
            Self::SkillAssessment => "skill_assessment",
            Self::PathwaySelection => "pathway_selection",
            Self::ActionPlanning => "action_planning",
            Self::Implementation => "implementation",
        };
        write!(f, "{s}")
    }
}

/// Full per-conversation state, passed by value per turn and persisted
/// between turns keyed by `conversation_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationState {
    /// Assigned at creation, immutable.
    pub conversation_id: Uuid,
    /// Immutable for the conversation's life.
    pub user_id: String,
    /// Ordered, append-only message log. Never empty after `open`.
    pub messages: Vec<Message>,
    pub journey_stage: JourneyStage,
    /// Set once the user affirms a proposed goal summary.
    pub goals_validated: bool,
    /// True while paused at a human-in-the-loop interrupt.
    pub awaiting_user_input: bool,
    /// The specialist that produced the last response. Advisory only.
    pub current_specialist: Option<SpecialistId>,
    pub workflow_state: WorkflowState,
    /// Populated when a turn ended in the error state.
    pub last_error: Option<String>,
    /// Set when the user terminated the session via the quit sentinel.
    pub session_closed: bool,
}

impl ConversationState {
    /// Open a new conversation with the user's first message.
    ///
    /// The only constructor — guarantees `messages` is non-empty from the
    /// moment the conversation exists.
    pub fn open(user_id: impl Into<String>, opening_message: impl Into<String>) -> Self {
        Self {
            conversation_id: Uuid::new_v4(),
            user_id: user_id.into(),
            messages: vec![Message::user(opening_message)],
            journey_stage: JourneyStage::default(),
            goals_validated: false,
            awaiting_user_input: false,
            current_specialist: None,
            workflow_state: WorkflowState::Initiated,
            last_error: None,
            session_closed: false,
        }
    }

    /// Append a message. The log only ever grows.
    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Latest user message content, if any.
    pub fn last_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }

    /// Advance the journey stage if `suggested` is strictly later than the
    /// current stage. Backward suggestions are ignored.
    ///
    /// Returns true when the stage moved.
    pub fn advance_stage(&mut self, suggested: JourneyStage) -> bool {
        if suggested.is_later_than(self.journey_stage) {
            tracing::debug!(
                conversation = %self.conversation_id,
                from = %self.journey_stage,
                to = %suggested,
                "Journey stage advanced"
            );
            self.journey_stage = suggested;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_starts_with_the_users_message() {
        let state = ConversationState::open("u1", "hello there");
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].role, Role::User);
        assert_eq!(state.messages[0].content, "hello there");
        assert_eq!(state.workflow_state, WorkflowState::Initiated);
        assert!(!state.awaiting_user_input);
        assert!(!state.session_closed);
    }

    #[test]
    fn stage_advances_forward_only() {
        let mut state = ConversationState::open("u1", "hi");
        assert!(state.advance_stage(JourneyStage::SkillAssessment));
        assert_eq!(state.journey_stage, JourneyStage::SkillAssessment);

        // Backward suggestion is ignored
        assert!(!state.advance_stage(JourneyStage::Exploration));
        assert_eq!(state.journey_stage, JourneyStage::SkillAssessment);

        // Same stage is not a move
        assert!(!state.advance_stage(JourneyStage::SkillAssessment));
    }

    #[test]
    fn stage_next_walks_the_full_ladder() {
        let mut current = JourneyStage::Discovery;
        let expected = [
            JourneyStage::Exploration,
            JourneyStage::SkillAssessment,
            JourneyStage::PathwaySelection,
            JourneyStage::ActionPlanning,
            JourneyStage::Implementation,
        ];
        for stage in expected {
            current = current.next().unwrap();
            assert_eq!(current, stage);
        }
        assert!(current.next().is_none());
    }

    #[test]
    fn stage_inference_matches_keywords() {
        assert_eq!(
            JourneyStage::infer_from_message("What's my plan for next steps?"),
            Some(JourneyStage::ActionPlanning)
        );
        assert_eq!(
            JourneyStage::infer_from_message("I already APPLIED to two roles"),
            Some(JourneyStage::Implementation)
        );
        assert_eq!(JourneyStage::infer_from_message("hello"), None);
    }

    #[test]
    fn state_serde_round_trip_is_lossless() {
        let mut state = ConversationState::open("user-42", "I'm a veteran");
        state.push_message(Message::assistant("Welcome! Let's talk careers."));
        state.journey_stage = JourneyStage::PathwaySelection;
        state.goals_validated = true;
        state.awaiting_user_input = true;
        state.current_specialist = Some(crate::router::SpecialistId::Veteran);
        state.workflow_state = WorkflowState::AwaitingInput;

        let json = serde_json::to_string(&state).unwrap();
        let parsed: ConversationState = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.conversation_id, state.conversation_id);
        assert_eq!(parsed.user_id, state.user_id);
        assert_eq!(parsed.messages, state.messages);
        assert_eq!(parsed.journey_stage, state.journey_stage);
        assert_eq!(parsed.goals_validated, state.goals_validated);
        assert_eq!(parsed.awaiting_user_input, state.awaiting_user_input);
        assert_eq!(parsed.current_specialist, state.current_specialist);
        assert_eq!(parsed.workflow_state, state.workflow_state);
        assert_eq!(parsed.session_closed, state.session_closed);
    }

    #[test]
    fn last_user_message_skips_assistant_entries() {
        let mut state = ConversationState::open("u1", "first");
        state.push_message(Message::assistant("reply"));
        state.push_message(Message::user("second"));
        state.push_message(Message::assistant("another reply"));
        assert_eq!(state.last_user_message(), Some("second"));
    }

    #[test]
    fn display_matches_serde_for_stages() {
        let stages = [
            JourneyStage::Discovery,
            JourneyStage::Exploration,
            JourneyStage::SkillAssessment,
            JourneyStage::PathwaySelection,
            JourneyStage::ActionPlanning,
            JourneyStage::Implementation,
        ];
        for stage in stages {
            let display = format!("{stage}");
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(format!("\"{display}\""), json);
        }
    }
}
