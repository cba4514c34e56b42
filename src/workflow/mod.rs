//! Workflow module — per-turn state machine and the turn engine.

pub mod engine;
pub mod state;

pub use engine::{TurnReply, Workflow, WorkflowConfig, WorkflowDeps};
pub use state::WorkflowState;
