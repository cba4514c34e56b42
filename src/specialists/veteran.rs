//! Veteran specialist — military-to-clean-economy transition guidance.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SpecialistError;
use crate::router::SpecialistId;
use crate::specialists::{
    ResponseMetadata, Specialist, SpecialistRequest, SpecialistResponse,
};
use crate::tools::{ExperienceLevel, LookupQuery, LookupRegistry};

// Placeholder constant, not a computed score.
const CONFIDENCE: f32 = 0.85;

/// Advises veterans and transitioning service members.
pub struct VeteranSpecialist {
    tools: Arc<LookupRegistry>,
}

impl VeteranSpecialist {
    pub fn new(tools: Arc<LookupRegistry>) -> Self {
        Self { tools }
    }
}

#[async_trait]
impl Specialist for VeteranSpecialist {
    fn id(&self) -> SpecialistId {
        SpecialistId::Veteran
    }

    async fn respond(
        &self,
        request: &SpecialistRequest,
    ) -> Result<SpecialistResponse, SpecialistError> {
        let mut metadata = ResponseMetadata::for_specialist(self.id(), CONFIDENCE);
        metadata.sources = vec!["dod_skillbridge".into(), "irec_census".into()];

        let skills_query = LookupQuery::for_background("veteran").with_skills(&[
            "logistics",
            "maintenance",
            "leadership",
        ]);
        let translated = match self.tools.run("skills_translation", &skills_query) {
            Ok(text) => {
                metadata.tools_used.push("skills_translation".into());
                text
            }
            Err(e) => {
                tracing::warn!(user = %request.user_id, error = %e, "Skills translation failed");
                return Ok(SpecialistResponse::fallback());
            }
        };

        let jobs_query = LookupQuery {
            background: Some("veteran".into()),
            experience_level: Some(ExperienceLevel::Entry),
            ..Default::default()
        };
        let roles = match self.tools.run("job_match", &jobs_query) {
            Ok(text) => {
                metadata.tools_used.push("job_match".into());
                text
            }
            Err(e) => {
                tracing::warn!(user = %request.user_id, error = %e, "Job match failed");
                return Ok(SpecialistResponse::fallback());
            }
        };

        let content = format!(
            "Thank you for your service — the clean economy actively recruits \
             veterans, and your background maps onto it better than you might \
             expect.\n\n{translated}\n{roles}\n\
             Programs like SkillBridge let you start one of these roles during \
             your final months of service. Want me to go deeper on any of them?"
        );

        Ok(SpecialistResponse { content, metadata })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolError;
    use crate::tools::LookupTool;

    /// A tool that always fails, for exercising the fallback path.
    struct BrokenTool(&'static str);

    impl LookupTool for BrokenTool {
        fn name(&self) -> &str {
            self.0
        }
        fn description(&self) -> &str {
            "always fails"
        }
        fn run(&self, _query: &LookupQuery) -> Result<String, ToolError> {
            Err(ToolError::ExecutionFailed {
                name: self.0.to_string(),
                reason: "dataset unavailable".to_string(),
            })
        }
    }

    fn request() -> SpecialistRequest {
        SpecialistRequest {
            message: "I'm a veteran interested in clean energy careers".into(),
            user_id: "u1".into(),
            conversation_id: None,
        }
    }

    #[tokio::test]
    async fn produces_content_with_veteran_metadata() {
        let specialist = VeteranSpecialist::new(Arc::new(LookupRegistry::with_builtins()));
        let resp = specialist.respond(&request()).await.unwrap();
        assert!(!resp.content.is_empty());
        assert_eq!(resp.metadata.specialist, "veteran");
        assert!(resp.metadata.tools_used.contains(&"job_match".to_string()));
        assert!(resp.metadata.confidence > 0.0);
    }

    #[tokio::test]
    async fn broken_tool_yields_fallback_not_error() {
        let mut registry = LookupRegistry::with_builtins();
        registry.register(Arc::new(BrokenTool("skills_translation")));
        let specialist = VeteranSpecialist::new(Arc::new(registry));

        let resp = specialist.respond(&request()).await.unwrap();
        assert!(resp.is_fallback());
        assert_eq!(resp.content, crate::specialists::FALLBACK_CONTENT);
    }

    #[tokio::test]
    async fn missing_tool_yields_fallback() {
        // Empty registry: every lookup is NotFound
        let specialist = VeteranSpecialist::new(Arc::new(LookupRegistry::new()));
        let resp = specialist.respond(&request()).await.unwrap();
        assert!(resp.is_fallback());
    }
}
