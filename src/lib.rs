//! Climate Economy Assistant — conversational career-guidance backend.

pub mod assistant;
pub mod channels;
pub mod config;
pub mod conversation;
pub mod error;
pub mod llm;
pub mod router;
pub mod specialists;
pub mod store;
pub mod tools;
pub mod workflow;
