//! Job matching tool — clean-economy roles filtered by background and level.

use crate::error::ToolError;
use crate::tools::{ExperienceLevel, LookupQuery, LookupTool};

/// One entry in the static role dataset.
struct RoleEntry {
    title: &'static str,
    sector: &'static str,
    level: ExperienceLevel,
    /// Background tags this role is a strong fit for. Empty = everyone.
    backgrounds: &'static [&'static str],
    note: &'static str,
}

const ROLES: &[RoleEntry] = &[
    RoleEntry {
        title: "Solar Installation Technician",
        sector: "solar",
        level: ExperienceLevel::Entry,
        backgrounds: &["veteran", "ej_community"],
        note: "paid on-the-job training is common; electrical experience helps",
    },
    RoleEntry {
        title: "Wind Turbine Service Technician",
        sector: "wind",
        level: ExperienceLevel::Entry,
        backgrounds: &["veteran"],
        note: "one of the fastest-growing trades; comfort with heights required",
    },
    RoleEntry {
        title: "Energy Efficiency Auditor",
        sector: "buildings",
        level: ExperienceLevel::Mid,
        backgrounds: &["ej_community", "international"],
        note: "BPI certification opens doors; strong local demand",
    },
    RoleEntry {
        title: "Grid Modernization Engineer",
        sector: "utilities",
        level: ExperienceLevel::Senior,
        backgrounds: &["international"],
        note: "electrical engineering degrees from abroad transfer well here",
    },
    RoleEntry {
        title: "Community Solar Program Coordinator",
        sector: "solar",
        level: ExperienceLevel::Mid,
        backgrounds: &["ej_community"],
        note: "community organizing experience is directly relevant",
    },
    RoleEntry {
        title: "EV Charging Infrastructure Planner",
        sector: "transportation",
        level: ExperienceLevel::Mid,
        backgrounds: &[],
        note: "logistics and project-management backgrounds fit well",
    },
    RoleEntry {
        title: "Battery Manufacturing Technician",
        sector: "manufacturing",
        level: ExperienceLevel::Entry,
        backgrounds: &["veteran", "international"],
        note: "maintenance and quality-control experience transfers directly",
    },
];

/// Matches clean-economy roles against a background tag and experience level.
pub struct JobMatchTool;

impl JobMatchTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JobMatchTool {
    fn default() -> Self {
        Self::new()
    }
}

impl LookupTool for JobMatchTool {
    fn name(&self) -> &str {
        "job_match"
    }

    fn description(&self) -> &str {
        "Match clean-economy roles to a background tag and experience level"
    }

    fn run(&self, query: &LookupQuery) -> Result<String, ToolError> {
        let matches: Vec<&RoleEntry> = ROLES
            .iter()
            .filter(|role| match &query.background {
                Some(tag) => {
                    role.backgrounds.is_empty() || role.backgrounds.contains(&tag.as_str())
                }
                None => true,
            })
            .filter(|role| match query.experience_level {
                Some(level) => role.level == level,
                None => true,
            })
            .collect();

        if matches.is_empty() {
            return Ok(
                "No direct role matches for that combination yet — broadening the \
                 search to adjacent sectors usually helps."
                    .to_string(),
            );
        }

        let mut out = String::from("Roles worth a look:\n");
        for role in matches {
            out.push_str(&format!(
                "- {} ({} sector, {} level) — {}\n",
                role.title, role.sector, role.level, role.note
            ));
        }
        Ok(out)
    }
}
