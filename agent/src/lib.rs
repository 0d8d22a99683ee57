//! Agent capability contract and built-in task handlers
//!
//! Every handler implements [`Agent`]: one polymorphic `execute` entry point
//! returning a [`DispatchResult`], plus a status accessor for introspection.

pub mod builtin;
pub mod capability;
pub mod error;
pub mod result;
pub mod state;

pub use builtin::{build_agent, AgentKind, TaskAutomationAgent, TextAgent};
pub use capability::{Agent, AgentStatus};
pub use error::{AgentError, Result};
pub use result::{DispatchResult, Kwargs};
pub use state::StateBag;
