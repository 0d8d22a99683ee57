//! Keyword-routed automation of simple tasks

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use crate::capability::Agent;
use crate::error::Result;
use crate::result::{DispatchResult, Kwargs};
use crate::state::StateBag;

/// One completed task
#[derive(Debug, Clone, Serialize)]
pub struct TaskRecord {
    pub task: String,
    pub status: String,
    pub result: String,
    pub completed_at: DateTime<Utc>,
}

/// Automates repetitive tasks, routed by keywords in the task description
pub struct TaskAutomationAgent {
    description: String,
    state: StateBag,
    history: Mutex<Vec<TaskRecord>>,
}

impl Default for TaskAutomationAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskAutomationAgent {
    pub fn new() -> Self {
        tracing::info!("Agent 'TaskAutomationAgent' initialized");
        Self {
            description: "Automates repetitive tasks and workflows".to_string(),
            state: StateBag::new(),
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Number of tasks completed so far
    pub fn tasks_completed(&self) -> u64 {
        self.state
            .get("tasks_completed")
            .and_then(|v| v.as_u64())
            .unwrap_or(0)
    }

    /// Completed tasks, oldest first
    pub fn task_history(&self) -> Vec<TaskRecord> {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn process(task: &str) -> String {
        let lower = task.to_lowercase();

        if lower.contains("file") {
            format!("File task completed: {}", task)
        } else if lower.contains("data") {
            format!("Data task completed: {}", task)
        } else if lower.contains("schedule") {
            format!("Schedule task completed: {}", task)
        } else {
            format!("Task '{}' processed successfully", task)
        }
    }
}

#[async_trait]
impl Agent for TaskAutomationAgent {
    fn name(&self) -> &str {
        "TaskAutomationAgent"
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn state(&self) -> &StateBag {
        &self.state
    }

    async fn execute(&self, task: &str, _kwargs: Kwargs) -> Result<DispatchResult> {
        tracing::info!("Executing task: {}", task);

        let result = Self::process(task);

        let completed = self.state.update("tasks_completed", |v| {
            json!(v.and_then(|v| v.as_u64()).unwrap_or(0) + 1)
        });

        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(TaskRecord {
                task: task.to_string(),
                status: "success".to_string(),
                result: result.clone(),
                completed_at: Utc::now(),
            });

        Ok(DispatchResult::success(task)
            .with_field("result", result)
            .with_field("tasks_completed", completed))
    }
}
