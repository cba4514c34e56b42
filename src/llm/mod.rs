//! LLM integration.
//!
//! Providers speak their HTTP APIs directly over `reqwest`:
//! - **OpenAI-compatible**: works with OpenAI, Groq, OpenRouter, and local
//!   servers via `base_url`.
//! - **Anthropic**: the `v1/messages` API.
//!
//! All providers are wrapped in [`RetryingProvider`] for bounded retries on
//! transient failures. Construction is explicit — no process-wide client
//! singletons; `main` owns the lifecycle and injects the provider.

pub mod anthropic;
pub mod openai;
pub mod provider;
pub mod retry;

pub use provider::{ChatMessage, Completion, LlmProvider, TokenUsage};
pub use retry::{RetryConfig, RetryingProvider};

use std::sync::Arc;

use crate::error::LlmError;

/// Supported LLM backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackend {
    OpenAi,
    Anthropic,
}

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub backend: LlmBackend,
    pub api_key: secrecy::SecretString,
    pub model: String,
    /// Override for OpenAI-compatible gateways; ignored by Anthropic.
    pub base_url: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Create a retry-wrapped LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let inner: Box<dyn LlmProvider> = match config.backend {
        LlmBackend::OpenAi => Box::new(openai::OpenAiProvider::new(config)),
        LlmBackend::Anthropic => Box::new(anthropic::AnthropicProvider::new(config)),
    };
    tracing::info!(model = %config.model, "LLM provider configured");
    Ok(Arc::new(RetryingProvider::new(inner, RetryConfig::default())))
}
