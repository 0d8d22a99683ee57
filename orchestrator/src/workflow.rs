//! Chain steps, workflow definitions and the workflow store
//!
//! A workflow is a named, reusable chain:
//! - Steps run in order through the orchestrator's chain executor
//! - A step may receive the previous step's result
//! - A failing step stops the chain unless it opts into `continue_on_error`

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use maestro_agent::Kwargs;

/// A single dispatch inside a chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainStep {
    /// Name of the agent to run (resolved at execution time)
    pub agent: String,

    /// Task description handed to the agent
    pub task: String,

    /// Keyword parameters for the agent
    #[serde(default)]
    pub kwargs: Kwargs,

    /// Forward the immediately preceding step's result as `previous_result`
    #[serde(default)]
    pub use_previous_result: bool,

    /// Keep going if this step fails
    #[serde(default)]
    pub continue_on_error: bool,
}

impl ChainStep {
    /// Create a step with no parameters
    pub fn new(agent: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            task: task.into(),
            kwargs: Kwargs::new(),
            use_previous_result: false,
            continue_on_error: false,
        }
    }

    /// Set a keyword parameter
    pub fn with_kwarg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.kwargs.insert(key.into(), value.into());
        self
    }

    /// Receive the previous step's result
    pub fn use_previous_result(mut self) -> Self {
        self.use_previous_result = true;
        self
    }

    /// Do not stop the chain when this step fails
    pub fn continue_on_error(mut self) -> Self {
        self.continue_on_error = true;
        self
    }
}

/// A complete workflow definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    /// Unique identifier for this workflow
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Steps, in execution order
    #[serde(default)]
    pub steps: Vec<ChainStep>,
}

impl Workflow {
    /// Create a new workflow
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            steps: Vec::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Add a step
    pub fn with_step(mut self, step: ChainStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Load workflow from TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self, WorkflowError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| WorkflowError::IoError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Load workflow from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, WorkflowError> {
        toml::from_str(toml_str)
            .map_err(|e| WorkflowError::ParseError(e.to_string()))
    }
}

/// Errors loading workflow definitions
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Named workflows, kept for the life of the process
#[derive(Debug, Clone, Default)]
pub struct WorkflowStore {
    workflows: HashMap<String, Workflow>,
}

impl WorkflowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a workflow, replacing any workflow with the same name.
    ///
    /// Referenced agents are not checked; that happens when it runs.
    pub fn create(&mut self, workflow: Workflow) -> Option<Workflow> {
        self.workflows.insert(workflow.name.clone(), workflow)
    }

    pub fn get(&self, name: &str) -> Option<&Workflow> {
        self.workflows.get(name)
    }

    /// All workflows, sorted by name
    pub fn list(&self) -> Vec<&Workflow> {
        let mut workflows: Vec<_> = self.workflows.values().collect();
        workflows.sort_by(|a, b| a.name.cmp(&b.name));
        workflows
    }

    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }
}

/// Load every `*.toml` workflow in a directory
pub fn load_workflows_dir(dir: &Path) -> Result<Vec<Workflow>, WorkflowError> {
    let mut workflows = Vec::new();

    if !dir.exists() {
        return Ok(workflows);
    }

    let entries = std::fs::read_dir(dir)
        .map_err(|e| WorkflowError::IoError(e.to_string()))?;

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "toml") {
            match Workflow::from_toml_file(&path) {
                Ok(workflow) => workflows.push(workflow),
                Err(e) => {
                    tracing::warn!("Failed to load workflow from {:?}: {}", path, e);
                }
            }
        }
    }

    workflows.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(workflows)
}
