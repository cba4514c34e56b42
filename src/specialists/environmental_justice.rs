//! Environmental-justice specialist — guidance for frontline-community members.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SpecialistError;
use crate::router::SpecialistId;
use crate::specialists::{
    ResponseMetadata, Specialist, SpecialistRequest, SpecialistResponse,
};
use crate::tools::{LookupQuery, LookupRegistry};

const CONFIDENCE: f32 = 0.8;

/// Advises members of environmental-justice communities.
pub struct EnvironmentalJusticeSpecialist {
    tools: Arc<LookupRegistry>,
}

impl EnvironmentalJusticeSpecialist {
    pub fn new(tools: Arc<LookupRegistry>) -> Self {
        Self { tools }
    }
}

#[async_trait]
impl Specialist for EnvironmentalJusticeSpecialist {
    fn id(&self) -> SpecialistId {
        SpecialistId::EnvironmentalJustice
    }

    async fn respond(
        &self,
        request: &SpecialistRequest,
    ) -> Result<SpecialistResponse, SpecialistError> {
        let mut metadata = ResponseMetadata::for_specialist(self.id(), CONFIDENCE);
        metadata.sources = vec!["justice40".into(), "epa_ej_screen".into()];

        let jobs_query = LookupQuery::for_background("ej_community");
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
            "Communities on the front lines of pollution deserve the first \
             seats at the clean-economy table, and a lot of funding now agrees \
             — Justice40 directs federal climate investment toward places like \
             yours.\n\n{roles}\n\
             Many of these roles hire locally and train on the job. Lived \
             experience in your community is a qualification, not a gap. Want \
             help finding programs near you?"
        );

        Ok(SpecialistResponse { content, metadata })
    }
}
