//! The single capability every agent implements

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::result::{DispatchResult, Kwargs};
use crate::state::StateBag;

/// Introspection snapshot returned by [`Agent::status`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStatus {
    pub name: String,
    pub description: String,
    pub state: Map<String, Value>,
}

/// A pluggable task handler.
///
/// The orchestrator only ever calls [`execute`](Agent::execute) and the
/// introspection accessors; what "execute" means is entirely up to the
/// implementation. Returning `Err` signals a fault in the handler's own
/// logic, which the orchestrator reports as a failed result.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Default registration name
    fn name(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> &str {
        ""
    }

    /// Agent-local state bag
    fn state(&self) -> &StateBag;

    /// Execute `task` with free-form keyword parameters
    async fn execute(&self, task: &str, kwargs: Kwargs) -> Result<DispatchResult>;

    fn status(&self) -> AgentStatus {
        AgentStatus {
            name: self.name().to_string(),
            description: self.description().to_string(),
            state: self.state().snapshot(),
        }
    }

    fn update_state(&self, key: &str, value: Value) {
        tracing::info!("Agent '{}' state updated: {}={}", self.name(), key, value);
        self.state().set(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct TestAgent {
        name: String,
        description: String,
        state: StateBag,
    }

    impl TestAgent {
        fn new(name: &str, description: &str) -> Self {
            Self {
                name: name.to_string(),
                description: description.to_string(),
                state: StateBag::new(),
            }
        }
    }

    #[async_trait]
    impl Agent for TestAgent {
        fn name(&self) -> &str {
            &self.name
        }

        fn description(&self) -> &str {
            &self.description
        }

        fn state(&self) -> &StateBag {
            &self.state
        }

        async fn execute(&self, task: &str, _kwargs: Kwargs) -> Result<DispatchResult> {
            Ok(DispatchResult::success(task))
        }
    }

    #[test]
    fn test_status() {
        let agent = TestAgent::new("TestAgent", "Test Description");
        let status = agent.status();

        assert_eq!(status.name, "TestAgent");
        assert_eq!(status.description, "Test Description");
        assert!(status.state.is_empty());
    }

    #[test]
    fn test_update_state() {
        let agent = TestAgent::new("TestAgent", "");
        agent.update_state("key1", json!("value1"));

        assert_eq!(agent.status().state["key1"], json!("value1"));
    }

    #[tokio::test]
    async fn test_execute() {
        let agent = TestAgent::new("TestAgent", "");
        let result = agent.execute("test task", Kwargs::new()).await.unwrap();

        assert_eq!(result.status(), "success");
        assert_eq!(result.task(), Some("test task"));
    }
}
