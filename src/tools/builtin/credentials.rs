//! Credential evaluation tool — equivalency guidance for international
//! degrees and certifications.

use crate::error::ToolError;
use crate::tools::{LookupQuery, LookupTool};

const GUIDANCE: &[(&str, &str)] = &[
    (
        "engineering",
        "Engineering degrees usually evaluate cleanly through NACES member \
         services; PE licensure is state-specific and may require exams.",
    ),
    (
        "electrical",
        "Electrical trade credentials typically need a state journeyman \
         assessment; documented hours from abroad often count toward it.",
    ),
    (
        "environmental",
        "Environmental science degrees transfer well; GIS and sampling \
         certifications are recognized as-is by most employers.",
    ),
    (
        "business",
        "Business and management degrees rarely need formal evaluation for \
         industry roles; keep transcripts translated and notarized.",
    ),
];

/// Evaluates international credentials against US clean-economy requirements.
pub struct CredentialEvaluationTool;

impl CredentialEvaluationTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CredentialEvaluationTool {
    fn default() -> Self {
        Self::new()
    }
}

impl LookupTool for CredentialEvaluationTool {
    fn name(&self) -> &str {
        "credential_evaluation"
    }

    fn description(&self) -> &str {
        "Equivalency guidance for international degrees and certifications"
    }

    fn run(&self, query: &LookupQuery) -> Result<String, ToolError> {
        let fields: Vec<&String> = query.skills.iter().collect();

        let mut out = String::from("Credential guidance:\n");
        let mut matched = 0;
        for field in &fields {
            let lowered = field.to_lowercase();
            for (term, advice) in GUIDANCE {
                if lowered.contains(term) {
                    out.push_str(&format!("- {field}: {advice}\n"));
                    matched += 1;
                }
            }
        }
        if matched == 0 {
            out.push_str(
                "- Start with a general NACES credential evaluation; most \
                 clean-economy employers accept those reports directly.\n",
            );
        }
        Ok(out)
    }
}
