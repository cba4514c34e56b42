//! Lookup tools — job matching, skills translation, credential evaluation.

pub mod builtin;
pub mod registry;

pub use registry::LookupRegistry;

use serde::{Deserialize, Serialize};

use crate::error::ToolError;

/// Experience level tag used by lookup queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
}

impl std::fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Entry => "entry",
            Self::Mid => "mid",
            Self::Senior => "senior",
        };
        write!(f, "{s}")
    }
}

/// Structured parameters for a lookup tool call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupQuery {
    /// Skills the user already has (free-form terms).
    pub skills: Vec<String>,
    /// Background tag: "veteran", "international", "ej_community", ...
    pub background: Option<String>,
    pub experience_level: Option<ExperienceLevel>,
}

impl LookupQuery {
    pub fn for_background(background: &str) -> Self {
        Self {
            background: Some(background.to_string()),
            ..Self::default()
        }
    }

    pub fn with_skills(mut self, skills: &[&str]) -> Self {
        self.skills = skills.iter().map(|s| s.to_string()).collect();
        self
    }
}

/// A named lookup tool. Pure: same query, same text, no side effects.
pub trait LookupTool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Produce formatted result text for the query.
    fn run(&self, query: &LookupQuery) -> Result<String, ToolError>;
}
