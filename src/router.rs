//! Keyword router — maps a user message to exactly one specialist.

use serde::{Deserialize, Serialize};

/// The fixed set of specialist identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialistId {
    Veteran,
    International,
    EnvironmentalJustice,
    /// Default handler when no more specific specialist matches.
    General,
}

impl SpecialistId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Veteran => "veteran",
            Self::International => "international",
            Self::EnvironmentalJustice => "environmental_justice",
            Self::General => "general",
        }
    }

    /// Parse from the wire/config string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "veteran" => Some(Self::Veteran),
            "international" => Some(Self::International),
            "environmental_justice" => Some(Self::EnvironmentalJustice),
            "general" => Some(Self::General),
            _ => None,
        }
    }
}

impl std::fmt::Display for SpecialistId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Strategy for mapping a message to a specialist.
///
/// Narrow on purpose: a model-based classifier can replace the keyword
/// router without touching the workflow.
pub trait MessageClassifier: Send + Sync {
    /// Map a raw user message to a specialist. Must never fail — unmatched
    /// input routes to [`SpecialistId::General`].
    fn classify(&self, message: &str) -> SpecialistId;
}

// Keyword lists checked in priority order. First match wins.
const VETERAN_KEYWORDS: &[&str] = &[
    "veteran", "military", "army", "navy", "air force", "marines",
    "coast guard", "service member", "deployment", "mos", "discharge",
];

const INTERNATIONAL_KEYWORDS: &[&str] = &[
    "international", "visa", "immigrant", "immigration", "foreign degree",
    "credential", "work permit", "h-1b", "green card", "abroad",
];

const ENVIRONMENTAL_JUSTICE_KEYWORDS: &[&str] = &[
    "environmental justice", "frontline community", "underserved",
    "pollution", "equity", "community organizing", "ej community",
];

/// Case-insensitive substring router over fixed keyword lists.
pub struct KeywordRouter;

impl KeywordRouter {
    pub fn new() -> Self {
        Self
    }

    fn contains_any(message: &str, keywords: &[&str]) -> bool {
        keywords.iter().any(|kw| message.contains(kw))
    }
}

impl Default for KeywordRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageClassifier for KeywordRouter {
    fn classify(&self, message: &str) -> SpecialistId {
        let lowered = message.to_lowercase();
        if Self::contains_any(&lowered, VETERAN_KEYWORDS) {
            SpecialistId::Veteran
        } else if Self::contains_any(&lowered, INTERNATIONAL_KEYWORDS) {
            SpecialistId::International
        } else if Self::contains_any(&lowered, ENVIRONMENTAL_JUSTICE_KEYWORDS) {
            SpecialistId::EnvironmentalJustice
        } else {
            SpecialistId::General
        }
    }
}
