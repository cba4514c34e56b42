//! Skills translation tool — maps military and other background skill terms
//! to their clean-economy equivalents.

use crate::error::ToolError;
use crate::tools::{LookupQuery, LookupTool};

/// Static mapping from background skill terms to clean-economy skills.
const SKILL_MAP: &[(&str, &str)] = &[
    ("logistics", "supply-chain coordination for solar and battery projects"),
    ("electronics", "PV system wiring, inverter diagnostics"),
    ("maintenance", "turbine and plant preventive maintenance"),
    ("leadership", "crew lead and site supervisor roles"),
    ("operations", "energy plant and grid operations"),
    ("mechanical", "wind turbine and HVAC heat-pump service"),
    ("communications", "community outreach and stakeholder engagement"),
    ("heavy equipment", "site preparation for utility-scale builds"),
    ("project management", "clean-energy project development"),
    ("quality control", "battery and module manufacturing QA"),
];

/// Translates existing skills into clean-economy framing.
pub struct SkillsTranslationTool;

impl SkillsTranslationTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SkillsTranslationTool {
    fn default() -> Self {
        Self::new()
    }
}

impl LookupTool for SkillsTranslationTool {
    fn name(&self) -> &str {
        "skills_translation"
    }

    fn description(&self) -> &str {
        "Translate existing skills into clean-economy equivalents"
    }

    fn run(&self, query: &LookupQuery) -> Result<String, ToolError> {
        if query.skills.is_empty() {
            return Err(ToolError::InvalidParameters {
                name: self.name().to_string(),
                reason: "at least one skill is required".to_string(),
            });
        }

        let mut out = String::from("How your skills transfer:\n");
        let mut matched = 0;
        for skill in &query.skills {
            let lowered = skill.to_lowercase();
            if let Some((_, target)) = SKILL_MAP
                .iter()
                .find(|(term, _)| lowered.contains(term) || term.contains(lowered.as_str()))
            {
                out.push_str(&format!("- {skill} → {target}\n"));
                matched += 1;
            }
        }
        if matched == 0 {
            out.push_str(
                "- No direct mapping found — transferable fundamentals (safety \
                 culture, teamwork, technical documentation) still count.\n",
            );
        }
        Ok(out)
    }
}
