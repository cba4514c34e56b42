//! Configuration types.

use crate::error::ConfigError;
use crate::router::SpecialistId;

/// Assistant configuration.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Assistant name for identification in logs.
    pub name: String,
    /// Sentinel recognized while awaiting input; ends the session.
    pub quit_token: String,
    /// Specialists whose dispatch pauses for human review first.
    pub interrupt_before: Vec<SpecialistId>,
    /// Maximum messages returned by the history endpoint.
    pub history_limit: usize,
    /// Port for the HTTP surface.
    pub http_port: u16,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: "cea-assist".to_string(),
            quit_token: "quit".to_string(),
            interrupt_before: Vec::new(),
            history_limit: 200,
            http_port: 8080,
        }
    }
}

impl AssistantConfig {
    /// Build configuration from `CEA_*` environment variables, falling back
    /// to defaults for anything unset. A variable that is set but invalid is
    /// an error rather than a silent fallback.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(token) = std::env::var("CEA_QUIT_TOKEN") {
            config.quit_token = parse_quit_token(&token)?;
        }

        if let Ok(list) = std::env::var("CEA_REVIEW_SPECIALISTS") {
            config.interrupt_before = parse_review_specialists(&list)?;
        }

        if let Ok(port) = std::env::var("CEA_HTTP_PORT") {
            config.http_port = parse_port(&port)?;
        }

        Ok(config)
    }
}

fn parse_quit_token(raw: &str) -> Result<String, ConfigError> {
    let token = raw.trim();
    if token.is_empty() {
        return Err(ConfigError::InvalidValue {
            key: "CEA_QUIT_TOKEN".to_string(),
            message: "quit token must not be empty".to_string(),
        });
    }
    Ok(token.to_string())
}

/// Comma-separated specialist ids, e.g. "veteran,international".
fn parse_review_specialists(raw: &str) -> Result<Vec<SpecialistId>, ConfigError> {
    let mut ids = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match SpecialistId::parse(part) {
            Some(id) => ids.push(id),
            None => {
                return Err(ConfigError::InvalidValue {
                    key: "CEA_REVIEW_SPECIALISTS".to_string(),
                    message: format!("unknown specialist: {part}"),
                });
            }
        }
    }
    Ok(ids)
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: "CEA_HTTP_PORT".to_string(),
        message: format!("not a valid port: {raw}"),
    })
}
