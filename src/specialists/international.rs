//! International specialist — guidance for internationally trained professionals.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SpecialistError;
use crate::router::SpecialistId;
use crate::specialists::{
    ResponseMetadata, Specialist, SpecialistRequest, SpecialistResponse,
};
use crate::tools::{LookupQuery, LookupRegistry};

const CONFIDENCE: f32 = 0.8;

/// Advises internationally trained professionals on credentials and roles.
pub struct InternationalSpecialist {
    tools: Arc<LookupRegistry>,
}

impl InternationalSpecialist {
    pub fn new(tools: Arc<LookupRegistry>) -> Self {
        Self { tools }
    }

    /// Pull likely credential fields out of the message. Falls back to the
    /// broad engineering/environmental pair when nothing is recognizable.
    fn credential_fields(message: &str) -> Vec<&'static str> {
        let lowered = message.to_lowercase();
        let mut fields = Vec::new();
        for field in ["engineering", "electrical", "environmental", "business"] {
            if lowered.contains(field) {
                fields.push(field);
            }
        }
        if fields.is_empty() {
            fields.push("engineering");
            fields.push("environmental");
        }
        fields
    }
}

#[async_trait]
impl Specialist for InternationalSpecialist {
    fn id(&self) -> SpecialistId {
        SpecialistId::International
    }

    async fn respond(
        &self,
        request: &SpecialistRequest,
    ) -> Result<SpecialistResponse, SpecialistError> {
        let mut metadata = ResponseMetadata::for_specialist(self.id(), CONFIDENCE);
        metadata.sources = vec!["naces".into(), "uscis_guidance".into()];

        let fields = Self::credential_fields(&request.message);
        let cred_query = LookupQuery::default().with_skills(&fields);
        let credentials = match self.tools.run("credential_evaluation", &cred_query) {
            Ok(text) => {
                metadata.tools_used.push("credential_evaluation".into());
                text
            }
            Err(e) => {
                tracing::warn!(user = %request.user_id, error = %e, "Credential evaluation failed");
                return Ok(SpecialistResponse::fallback());
            }
        };

        let jobs_query = LookupQuery::for_background("international");
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
            "Welcome — internationally trained professionals are in real demand \
             across the clean economy, and most credential hurdles are smaller \
             than they look.\n\n{credentials}\n{roles}\n\
             If you tell me your degree field and country, I can get more \
             specific about the evaluation route."
        );

        Ok(SpecialistResponse { content, metadata })
    }
}
