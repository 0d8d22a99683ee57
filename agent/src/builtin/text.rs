//! String manipulation handler

use async_trait::async_trait;
use serde_json::Value;

use crate::capability::Agent;
use crate::error::{AgentError, Result};
use crate::result::{DispatchResult, Kwargs};
use crate::state::StateBag;

/// Transforms `kwargs["text"]` according to the task description.
///
/// Supported operations: `upper`, `lower`, `reverse`, `count` (word count).
/// When no `text` is given, the `result` field of a forwarded
/// `previous_result` is used instead.
pub struct TextAgent {
    description: String,
    state: StateBag,
}

impl Default for TextAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl TextAgent {
    pub fn new() -> Self {
        tracing::info!("Agent 'TextAgent' initialized");
        Self {
            description: "Performs string manipulation on text input".to_string(),
            state: StateBag::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    fn input(kwargs: &Kwargs) -> Result<String> {
        if let Some(text) = kwargs.get("text") {
            return text
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| AgentError::InvalidParams("'text' must be a string".to_string()));
        }

        kwargs
            .get("previous_result")
            .and_then(|prev| prev.get("result"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AgentError::InvalidParams("missing 'text' parameter".to_string()))
    }
}

#[async_trait]
impl Agent for TextAgent {
    fn name(&self) -> &str {
        "TextAgent"
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn state(&self) -> &StateBag {
        &self.state
    }

    async fn execute(&self, task: &str, kwargs: Kwargs) -> Result<DispatchResult> {
        let text = Self::input(&kwargs)?;
        let lower = task.to_lowercase();

        let result = if lower.contains("upper") {
            Value::from(text.to_uppercase())
        } else if lower.contains("lower") {
            Value::from(text.to_lowercase())
        } else if lower.contains("reverse") {
            Value::from(text.chars().rev().collect::<String>())
        } else if lower.contains("count") {
            Value::from(text.split_whitespace().count())
        } else {
            return Err(AgentError::UnsupportedTask(task.to_string()));
        };

        self.state.set("last_task", task);

        Ok(DispatchResult::success(task).with_field("result", result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn kwargs(value: Value) -> Kwargs {
        value.as_object().cloned().unwrap_or_default()
    }

    #[tokio::test]
    async fn test_transforms() {
        let agent = TextAgent::new();

        let result = agent
            .execute("uppercase it", kwargs(json!({"text": "hello world"})))
            .await
            .unwrap();
        assert_eq!(result.get("result"), Some(&json!("HELLO WORLD")));

        let result = agent
            .execute("reverse", kwargs(json!({"text": "abc"})))
            .await
            .unwrap();
        assert_eq!(result.get("result"), Some(&json!("cba")));

        let result = agent
            .execute("count words", kwargs(json!({"text": "one two  three"})))
            .await
            .unwrap();
        assert_eq!(result.get("result"), Some(&json!(3)));
        assert_eq!(agent.state().get("last_task"), Some(json!("count words")));
    }

    #[tokio::test]
    async fn test_uses_previous_result() {
        let agent = TextAgent::new();
        let args = kwargs(json!({
            "previous_result": {"status": "success", "result": "Chained Input"}
        }));

        let result = agent.execute("lowercase", args).await.unwrap();
        assert_eq!(result.get("result"), Some(&json!("chained input")));
    }

    #[tokio::test]
    async fn test_missing_text() {
        let agent = TextAgent::new();
        let err = agent.execute("upper", Kwargs::new()).await.unwrap_err();
        assert!(matches!(err, AgentError::InvalidParams(_)));
    }

    #[tokio::test]
    async fn test_unsupported_task() {
        let agent = TextAgent::new();
        let err = agent
            .execute("translate", kwargs(json!({"text": "x"})))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::UnsupportedTask(_)));
    }
}
