//! Multi-agent task orchestration
//!
//! This crate provides:
//! - An agent registry keyed by logical name
//! - Single-step dispatch that never fails and always records history
//! - Sequential chains with result forwarding and stop-on-failure
//! - Independent (concurrent) step execution
//! - Named, reusable workflows, loadable from TOML
//!
//! # Example
//!
//! ```rust,ignore
//! use orchestrator::{ChainStep, EngineConfig, Orchestrator};
//!
//! let orchestrator = Orchestrator::new(EngineConfig::default());
//! orchestrator.register_kind("task_automation", Some("automation"), &Default::default())?;
//!
//! let results = orchestrator
//!     .execute_chain(&[
//!         ChainStep::new("automation", "Process data"),
//!         ChainStep::new("automation", "Schedule report").use_previous_result(),
//!     ])
//!     .await;
//! ```

pub mod agent_config;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
#[cfg(feature = "web")]
pub mod web;
pub mod workflow;

pub use agent_config::{AgentRegistry, AgentSpec};
pub use config::OrchestratorConfig;
pub use engine::{EngineConfig, Orchestrator, PREVIOUS_RESULT_KEY};
pub use error::OrchestratorError;
pub use history::{ExecutionHistory, HistoryEntry};
pub use workflow::{ChainStep, Workflow, WorkflowError, WorkflowStore};

/// Re-export commonly used types from the agent crate
pub use maestro_agent::{Agent, AgentKind, AgentStatus, DispatchResult, Kwargs};
