//! General specialist — the default handler when no population-specific
//! specialist matches.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SpecialistError;
use crate::llm::{ChatMessage, LlmProvider};
use crate::router::SpecialistId;
use crate::specialists::{
    ResponseMetadata, Specialist, SpecialistRequest, SpecialistResponse,
};
use crate::tools::{LookupQuery, LookupRegistry};

const CONFIDENCE: f32 = 0.7;

const SYSTEM_PROMPT: &str = "You are a concise career advisor for the clean economy. \
     Answer in a short, encouraging paragraph. Do not invent job statistics.";

/// Default career-guidance handler.
///
/// Uses the configured LLM provider to tailor its answer when one is
/// available; otherwise assembles a templated overview. Provider failures
/// degrade to the template, never to an error.
pub struct GeneralSpecialist {
    tools: Arc<LookupRegistry>,
    llm: Option<Arc<dyn LlmProvider>>,
}

impl GeneralSpecialist {
    pub fn new(tools: Arc<LookupRegistry>, llm: Option<Arc<dyn LlmProvider>>) -> Self {
        Self { tools, llm }
    }

    fn templated_overview(roles: &str) -> String {
        format!(
            "The clean economy spans solar, wind, grid modernization, efficient \
             buildings, and electrified transport — and most of it is hiring.\n\n\
             {roles}\n\
             Tell me about your background (military service, international \
             training, your community) and I can point you at the most relevant \
             path."
        )
    }
}

#[async_trait]
impl Specialist for GeneralSpecialist {
    fn id(&self) -> SpecialistId {
        SpecialistId::General
    }

    async fn respond(
        &self,
        request: &SpecialistRequest,
    ) -> Result<SpecialistResponse, SpecialistError> {
        let mut metadata = ResponseMetadata::for_specialist(self.id(), CONFIDENCE);

        let roles = match self.tools.run("job_match", &LookupQuery::default()) {
            Ok(text) => {
                metadata.tools_used.push("job_match".into());
                text
            }
            Err(e) => {
                tracing::warn!(user = %request.user_id, error = %e, "Job match failed");
                return Ok(SpecialistResponse::fallback());
            }
        };

        // Prefer an LLM-tailored answer when a provider is wired in.
        if let Some(llm) = &self.llm {
            let messages = vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(format!(
                    "User message: {}\n\nRelevant roles:\n{}",
                    request.message, roles
                )),
            ];
            match llm.complete(&messages).await {
                Ok(completion) if !completion.content.trim().is_empty() => {
                    metadata.sources.push(llm.model_name().to_string());
                    return Ok(SpecialistResponse {
                        content: completion.content,
                        metadata,
                    });
                }
                Ok(_) => {
                    tracing::warn!("LLM returned empty completion, using template");
                }
                Err(e) => {
                    // UpstreamProviderFailure: log and degrade to the template.
                    tracing::warn!(error = %e, "LLM completion failed, using template");
                }
            }
        }

        Ok(SpecialistResponse {
            content: Self::templated_overview(&roles),
            metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use crate::llm::{Completion, TokenUsage};

    struct FailingProvider;

    #[async_trait]
    impl LlmProvider for FailingProvider {
        fn model_name(&self) -> &str {
            "failing-model"
        }
        async fn complete(&self, _messages: &[ChatMessage]) -> Result<Completion, LlmError> {
            Err(LlmError::RequestFailed {
                provider: "test".into(),
                reason: "simulated outage".into(),
            })
        }
    }

    struct CannedProvider;

    #[async_trait]
    impl LlmProvider for CannedProvider {
        fn model_name(&self) -> &str {
            "canned-model"
        }
        async fn complete(&self, _messages: &[ChatMessage]) -> Result<Completion, LlmError> {
            Ok(Completion {
                content: "Tailored advice.".into(),
                usage: TokenUsage {
                    input_tokens: 10,
                    output_tokens: 3,
                },
            })
        }
    }

    fn request() -> SpecialistRequest {
        SpecialistRequest {
            message: "What jobs are growing?".into(),
            user_id: "u1".into(),
            conversation_id: None,
        }
    }

    #[tokio::test]
    async fn without_llm_uses_template() {
        let specialist =
            GeneralSpecialist::new(Arc::new(LookupRegistry::with_builtins()), None);
        let resp = specialist.respond(&request()).await.unwrap();
        assert_eq!(resp.metadata.specialist, "general");
        assert!(resp.content.contains("clean economy"));
    }

    #[tokio::test]
    async fn llm_failure_degrades_to_template() {
        let specialist = GeneralSpecialist::new(
            Arc::new(LookupRegistry::with_builtins()),
            Some(Arc::new(FailingProvider)),
        );
        let resp = specialist.respond(&request()).await.unwrap();
        // Not the fallback apology — the template still answers.
        assert!(!resp.is_fallback());
        assert!(resp.content.contains("clean economy"));
    }

    #[tokio::test]
    async fn llm_success_is_used_verbatim() {
        let specialist = GeneralSpecialist::new(
            Arc::new(LookupRegistry::with_builtins()),
            Some(Arc::new(CannedProvider)),
        );
        let resp = specialist.respond(&request()).await.unwrap();
        assert_eq!(resp.content, "Tailored advice.");
        assert!(resp.metadata.sources.contains(&"canned-model".to_string()));
    }
}
