//! Built-in task handlers and the factory that builds them by declared type

mod task_automation;
mod text;

pub use task_automation::{TaskAutomationAgent, TaskRecord};
pub use text::TextAgent;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::capability::Agent;
use crate::error::{AgentError, Result};
use crate::result::Kwargs;

/// Declared type of a built-in agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    TaskAutomation,
    Text,
}

impl AgentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::TaskAutomation => "task_automation",
            AgentKind::Text => "text",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "task_automation" => Ok(AgentKind::TaskAutomation),
            "text" => Ok(AgentKind::Text),
            other => Err(AgentError::UnknownKind(other.to_string())),
        }
    }
}

/// Build an agent of `kind`.
///
/// `config` may carry a `description` string overriding the default one;
/// other keys are ignored.
pub fn build_agent(kind: AgentKind, config: &Kwargs) -> Arc<dyn Agent> {
    let description = config.get("description").and_then(|v| v.as_str());

    match kind {
        AgentKind::TaskAutomation => {
            let agent = TaskAutomationAgent::new();
            match description {
                Some(d) => Arc::new(agent.with_description(d)),
                None => Arc::new(agent),
            }
        }
        AgentKind::Text => {
            let agent = TextAgent::new();
            match description {
                Some(d) => Arc::new(agent.with_description(d)),
                None => Arc::new(agent),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_parse() {
        assert_eq!("task_automation".parse::<AgentKind>().unwrap(), AgentKind::TaskAutomation);
        assert_eq!(" Text ".parse::<AgentKind>().unwrap(), AgentKind::Text);
        assert!(matches!(
            "web_scraping".parse::<AgentKind>(),
            Err(AgentError::UnknownKind(k)) if k == "web_scraping"
        ));
    }

    #[test]
    fn test_build_agent() {
        let agent = build_agent(AgentKind::TaskAutomation, &Kwargs::new());
        assert_eq!(agent.name(), "TaskAutomationAgent");

        let mut config = Kwargs::new();
        config.insert("description".to_string(), json!("Custom text handler"));
        let agent = build_agent(AgentKind::Text, &config);
        assert_eq!(agent.name(), "TextAgent");
        assert_eq!(agent.description(), "Custom text handler");
    }
}
