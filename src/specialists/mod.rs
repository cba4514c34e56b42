//! Specialist advisory agents — one per user population, plus the fallback.

pub mod environmental_justice;
pub mod general;
pub mod international;
pub mod registry;
pub mod veteran;

pub use environmental_justice::EnvironmentalJusticeSpecialist;
pub use general::GeneralSpecialist;
pub use international::InternationalSpecialist;
pub use registry::{DispatchOutcome, SpecialistRegistry};
pub use veteran::VeteranSpecialist;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SpecialistError;
use crate::router::SpecialistId;

/// Metadata tag used when a response came from the fallback path rather
/// than a real specialist.
pub const FALLBACK_SPECIALIST: &str = "fallback_system";

/// The fixed apology returned on any specialist failure.
pub const FALLBACK_CONTENT: &str = "I'm sorry — I wasn't able to put together a full answer \
     just now. Could you rephrase, or tell me a bit more about what you're looking for?";

/// Request passed to a specialist for one turn.
#[derive(Debug, Clone)]
pub struct SpecialistRequest {
    pub message: String,
    pub user_id: String,
    /// Absent on the very first exchange of an anonymous probe.
    pub conversation_id: Option<Uuid>,
}

/// Metadata attached to every specialist response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Specialist tag; `"fallback_system"` on the fallback path.
    pub specialist: String,
    pub tools_used: Vec<String>,
    /// Placeholder constant per specialist, not a computed score.
    pub confidence: f32,
    pub sources: Vec<String>,
}

impl ResponseMetadata {
    pub fn for_specialist(id: SpecialistId, confidence: f32) -> Self {
        Self {
            specialist: id.as_str().to_string(),
            tools_used: Vec::new(),
            confidence,
            sources: Vec::new(),
        }
    }
}

/// A specialist's response payload for one turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialistResponse {
    pub content: String,
    pub metadata: ResponseMetadata,
}

impl SpecialistResponse {
    /// The best-effort fallback used whenever a specialist cannot answer.
    pub fn fallback() -> Self {
        Self {
            content: FALLBACK_CONTENT.to_string(),
            metadata: ResponseMetadata {
                specialist: FALLBACK_SPECIALIST.to_string(),
                tools_used: Vec::new(),
                confidence: 0.0,
                sources: Vec::new(),
            },
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.metadata.specialist == FALLBACK_SPECIALIST
    }
}

/// A named response-generation strategy scoped to a user population.
///
/// Stateless: everything a turn needs arrives in the request. Implementations
/// swallow their own tool failures and return [`SpecialistResponse::fallback`]
/// instead of erroring; the registry catches anything that still escapes.
#[async_trait]
pub trait Specialist: Send + Sync {
    fn id(&self) -> SpecialistId;

    async fn respond(
        &self,
        request: &SpecialistRequest,
    ) -> Result<SpecialistResponse, SpecialistError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_response_is_tagged_and_apologetic() {
        let resp = SpecialistResponse::fallback();
        assert!(resp.is_fallback());
        assert_eq!(resp.metadata.specialist, FALLBACK_SPECIALIST);
        assert_eq!(resp.content, FALLBACK_CONTENT);
        assert_eq!(resp.metadata.confidence, 0.0);
    }

    #[test]
    fn metadata_serializes_with_specialist_tag() {
        let meta = ResponseMetadata::for_specialist(SpecialistId::Veteran, 0.75);
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["specialist"], "veteran");
        // 0.75 is exact in binary, so the f32 -> f64 widening is lossless
        assert_eq!(json["confidence"], 0.75);
    }
}
