//! Errors surfaced by orchestrator operations that sit outside the
//! dispatch result model

use maestro_agent::AgentError;

use crate::workflow::WorkflowError;

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("Agent '{0}' not found")]
    AgentNotFound(String),

    #[error("Workflow '{0}' not found")]
    WorkflowNotFound(String),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;
