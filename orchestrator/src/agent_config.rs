//! Agent configuration and registry
//!
//! Declarative agent specs (kind + optional name + config) and the
//! name-to-instance registry the orchestrator dispatches through.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use maestro_agent::{build_agent, Agent, AgentKind, Kwargs};
use serde::{Deserialize, Serialize};

/// Declared agent to build at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSpec {
    /// Built-in agent type (e.g. "task_automation", "text")
    pub kind: AgentKind,

    /// Registration name (defaults to the agent's own name)
    #[serde(default)]
    pub name: Option<String>,

    /// Kind-specific configuration
    #[serde(default)]
    pub config: Kwargs,
}

impl AgentSpec {
    /// Build the agent instance
    pub fn build(&self) -> Arc<dyn Agent> {
        build_agent(self.kind, &self.config)
    }
}

/// Registry of live agents, keyed by logical name
#[derive(Default)]
pub struct AgentRegistry {
    agents: HashMap<String, Arc<dyn Agent>>,
}

impl fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentRegistry")
            .field("agents", &self.names())
            .finish()
    }
}

impl AgentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent under `name`, or under its own name if `None`.
    ///
    /// An existing entry with the same name is replaced. Returns the name
    /// the agent was stored under.
    pub fn register(&mut self, agent: Arc<dyn Agent>, name: Option<&str>) -> String {
        let name = name.unwrap_or_else(|| agent.name()).to_string();
        if self.agents.insert(name.clone(), agent).is_some() {
            tracing::debug!("Replaced existing agent: {}", name);
        }
        name
    }

    /// Remove an agent. Returns whether it was present.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.agents.remove(name).is_some()
    }

    /// Get an agent by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Agent>> {
        self.agents.get(name).cloned()
    }

    /// All registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.agents.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maestro_agent::{TaskAutomationAgent, TextAgent};

    #[test]
    fn test_register_lists_both() {
        let mut registry = AgentRegistry::new();
        registry.register(Arc::new(TaskAutomationAgent::new()), None);
        registry.register(Arc::new(TextAgent::new()), None);

        assert_eq!(registry.names(), vec!["TaskAutomationAgent", "TextAgent"]);
    }

    #[test]
    fn test_register_under_alias_overwrites() {
        let mut registry = AgentRegistry::new();
        let name = registry.register(Arc::new(TaskAutomationAgent::new()), Some("worker"));
        assert_eq!(name, "worker");

        registry.register(Arc::new(TextAgent::new()), Some("worker"));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("worker").unwrap().name(), "TextAgent");
    }

    #[test]
    fn test_unregister_missing_is_noop() {
        let mut registry = AgentRegistry::new();
        registry.register(Arc::new(TextAgent::new()), None);

        assert!(!registry.unregister("ghost"));
        assert!(registry.unregister("TextAgent"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_spec_from_toml() {
        let spec: AgentSpec = toml::from_str(
            r#"
            kind = "task_automation"
            name = "automation"

            [config]
            description = "Nightly jobs"
            "#,
        )
        .unwrap();

        assert_eq!(spec.kind, AgentKind::TaskAutomation);
        assert_eq!(spec.name.as_deref(), Some("automation"));
        assert_eq!(spec.build().description(), "Nightly jobs");
    }
}
