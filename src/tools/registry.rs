//! Registry of available lookup tools.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ToolError;
use crate::tools::{LookupQuery, LookupTool};

/// Name-keyed registry of lookup tools.
///
/// Built once at startup, then shared immutably behind an `Arc` — tools are
/// pure and need no interior mutability.
pub struct LookupRegistry {
    tools: HashMap<String, Arc<dyn LookupTool>>,
}

impl LookupRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Create a registry with all built-in tools registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(crate::tools::builtin::jobs::JobMatchTool::new()));
        registry.register(Arc::new(
            crate::tools::builtin::skills::SkillsTranslationTool::new(),
        ));
        registry.register(Arc::new(
            crate::tools::builtin::credentials::CredentialEvaluationTool::new(),
        ));
        registry
    }

    /// Register a tool, replacing any previous tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn LookupTool>) {
        let name = tool.name().to_string();
        tracing::debug!(tool = %name, "Registered lookup tool");
        self.tools.insert(name, tool);
    }

    /// Run a tool by name.
    pub fn run(&self, name: &str, query: &LookupQuery) -> Result<String, ToolError> {
        let tool = self.tools.get(name).ok_or_else(|| ToolError::NotFound {
            name: name.to_string(),
        })?;
        tool.run(query)
    }

    /// Check if a tool exists.
    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// List all tool names, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered tools.
    pub fn count(&self) -> usize {
        self.tools.len()
    }
}

impl Default for LookupRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_registered() {
        let registry = LookupRegistry::with_builtins();
        assert_eq!(registry.count(), 3);
        assert!(registry.has("job_match"));
        assert!(registry.has("skills_translation"));
        assert!(registry.has("credential_evaluation"));
    }

    #[test]
    fn unknown_tool_is_not_found() {
        let registry = LookupRegistry::with_builtins();
        let err = registry
            .run("does_not_exist", &LookupQuery::default())
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound { .. }));
    }

    #[test]
    fn registering_same_name_replaces() {
        let mut registry = LookupRegistry::new();
        registry.register(Arc::new(crate::tools::builtin::jobs::JobMatchTool::new()));
        registry.register(Arc::new(crate::tools::builtin::jobs::JobMatchTool::new()));
        assert_eq!(registry.count(), 1);
    }
}
