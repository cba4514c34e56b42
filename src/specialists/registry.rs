//! Specialist registry — maps identifiers to implementations with a safe
//! dispatch boundary.

use std::collections::HashMap;
use std::sync::Arc;

use crate::llm::LlmProvider;
use crate::router::SpecialistId;
use crate::specialists::{
    EnvironmentalJusticeSpecialist, GeneralSpecialist, InternationalSpecialist, Specialist,
    SpecialistRequest, SpecialistResponse, VeteranSpecialist,
};
use crate::tools::LookupRegistry;

/// What a dispatch produced: always a usable response, plus the failure
/// text when an error was caught at this boundary.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub response: SpecialistResponse,
    pub failure: Option<String>,
}

/// Registry of specialists keyed by identifier.
pub struct SpecialistRegistry {
    specialists: HashMap<SpecialistId, Arc<dyn Specialist>>,
}

impl SpecialistRegistry {
    /// Create an empty registry (tests wire their own specialists).
    pub fn new() -> Self {
        Self {
            specialists: HashMap::new(),
        }
    }

    /// Create a registry with all four specialists wired to the given tools
    /// and optional LLM provider.
    pub fn with_defaults(tools: Arc<LookupRegistry>, llm: Option<Arc<dyn LlmProvider>>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(VeteranSpecialist::new(Arc::clone(&tools))));
        registry.register(Arc::new(InternationalSpecialist::new(Arc::clone(&tools))));
        registry.register(Arc::new(EnvironmentalJusticeSpecialist::new(Arc::clone(
            &tools,
        ))));
        registry.register(Arc::new(GeneralSpecialist::new(tools, llm)));
        registry
    }

    pub fn register(&mut self, specialist: Arc<dyn Specialist>) {
        self.specialists.insert(specialist.id(), specialist);
    }

    pub fn count(&self) -> usize {
        self.specialists.len()
    }

    /// Dispatch a request to a specialist. Never fails: a missing specialist
    /// or an error that escapes one becomes the fixed fallback response, with
    /// the failure text carried alongside so callers can record it.
    pub async fn dispatch(
        &self,
        id: SpecialistId,
        request: &SpecialistRequest,
    ) -> DispatchOutcome {
        let Some(specialist) = self.specialists.get(&id) else {
            tracing::error!(specialist = %id, "No specialist registered, using fallback");
            return DispatchOutcome {
                response: SpecialistResponse::fallback(),
                failure: Some(format!("no specialist registered for {id}")),
            };
        };

        match specialist.respond(request).await {
            Ok(response) => DispatchOutcome {
                response,
                failure: None,
            },
            Err(e) => {
                tracing::error!(specialist = %id, error = %e, "Specialist failed, using fallback");
                DispatchOutcome {
                    response: SpecialistResponse::fallback(),
                    failure: Some(e.to_string()),
                }
            }
        }
    }
}

impl Default for SpecialistRegistry {
    fn default() -> Self {
        Self::new()
    }
}
