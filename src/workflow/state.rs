//! Workflow state machine — tracks where a conversation's current turn is.

use serde::{Deserialize, Serialize};

/// The states a conversation turn moves through.
///
/// Happy path: Initiated → Processing → Analyzing → Completed.
/// Processing may pause at AwaitingInput (human-in-the-loop) before
/// dispatch; AwaitingInput resumes to Processing on a new human message, or
/// ends at Completed on the quit sentinel. Processing and Analyzing may fall
/// into Error. Completed and Error re-enter Processing on the next turn —
/// each turn is a fresh synchronous call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Initiated,
    Processing,
    AwaitingInput,
    Analyzing,
    Completed,
    Error,
}

impl WorkflowState {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: WorkflowState) -> bool {
        use WorkflowState::*;
        matches!(
            (self, target),
            (Initiated, Processing)
                | (Processing, AwaitingInput)
                | (Processing, Analyzing)
                | (Processing, Error)
                | (AwaitingInput, Processing)
                | (AwaitingInput, Completed)
                | (Analyzing, Completed)
                | (Analyzing, Error)
                | (Completed, Processing)
                | (Error, Processing)
        )
    }

    /// Whether the state pauses the flow until a new human message arrives.
    pub fn is_paused(&self) -> bool {
        matches!(self, Self::AwaitingInput)
    }

    /// Whether the turn has finished (successfully or not).
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::Initiated
    }
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Initiated => "initiated",
            Self::Processing => "processing",
            Self::AwaitingInput => "awaiting_input",
            Self::Analyzing => "analyzing",
            Self::Completed => "completed",
            Self::Error => "error",
        };
        write!(f, "{s}")
    }
}
