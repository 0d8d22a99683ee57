//! Errors raised by an agent's own task logic

use thiserror::Error;

/// Fault raised while an agent executes a task.
///
/// The orchestrator never propagates these; they are converted into a
/// failed [`DispatchResult`](crate::DispatchResult) at the dispatch boundary.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Unsupported task: {0}")]
    UnsupportedTask(String),

    #[error("Unknown agent type: {0}")]
    UnknownKind(String),

    #[error("Execution error: {0}")]
    Execution(String),
}

pub type Result<T> = std::result::Result<T, AgentError>;
