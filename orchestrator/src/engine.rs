//! Orchestration engine
//!
//! One explicitly constructed [`Orchestrator`] owns all coordinator state:
//! - Agent registry (register, unregister, list, status)
//! - Single-step dispatch with history bookkeeping
//! - Sequential chains with failure short-circuiting
//! - Independent (concurrent) step execution
//! - Named, reusable workflows

use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use futures_util::future::join_all;
use maestro_agent::{Agent, AgentKind, AgentStatus, DispatchResult, Kwargs};

use crate::agent_config::{AgentRegistry, AgentSpec};
use crate::config::OrchestratorConfig;
use crate::error::{OrchestratorError, Result};
use crate::history::{ExecutionHistory, HistoryEntry};
use crate::workflow::{load_workflows_dir, ChainStep, Workflow, WorkflowStore};

/// Key under which a chain step receives the preceding step's result
pub const PREVIOUS_RESULT_KEY: &str = "previous_result";

/// Configuration for the orchestration engine
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Upper bound on a single agent invocation (None = wait indefinitely)
    pub dispatch_timeout: Option<Duration>,
}

impl EngineConfig {
    /// Create from file config. A timeout of 0 ms means no limit.
    pub fn from_file_config(config: &OrchestratorConfig) -> Self {
        Self {
            dispatch_timeout: config
                .orchestrator
                .dispatch_timeout_ms
                .map(Duration::from_millis)
                .filter(|limit| !limit.is_zero()),
        }
    }

    /// Bound every dispatch by `timeout`; a zero duration removes the bound
    pub fn with_dispatch_timeout(mut self, timeout: Duration) -> Self {
        self.dispatch_timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }
}

/// Coordinator over a set of agents
#[derive(Debug, Default)]
pub struct Orchestrator {
    config: EngineConfig,
    registry: RwLock<AgentRegistry>,
    history: Mutex<ExecutionHistory>,
    workflows: RwLock<WorkflowStore>,
}

impl Orchestrator {
    /// Create an empty orchestrator
    pub fn new(config: EngineConfig) -> Self {
        tracing::info!("Orchestrator initialized");
        Self {
            config,
            ..Default::default()
        }
    }

    /// Build from a loaded config file: declared agents and workflows are
    /// registered up front.
    pub fn from_config(config: &OrchestratorConfig) -> Result<Self> {
        let orchestrator = Self::new(EngineConfig::from_file_config(config));

        for spec in &config.agents {
            orchestrator.register_spec(spec);
        }

        if let Some(dir) = &config.orchestrator.workflows_dir {
            for workflow in load_workflows_dir(dir)? {
                orchestrator.add_workflow(workflow);
            }
        }

        for workflow in &config.workflows {
            orchestrator.add_workflow(workflow.clone());
        }

        Ok(orchestrator)
    }

    // Locks are never held across an await; a poisoned lock only means a
    // panic elsewhere, the data itself is still consistent.
    fn registry(&self) -> RwLockReadGuard<'_, AgentRegistry> {
        self.registry.read().unwrap_or_else(|e| e.into_inner())
    }

    fn registry_mut(&self) -> RwLockWriteGuard<'_, AgentRegistry> {
        self.registry.write().unwrap_or_else(|e| e.into_inner())
    }

    fn history_log(&self) -> MutexGuard<'_, ExecutionHistory> {
        self.history.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn store(&self) -> RwLockReadGuard<'_, WorkflowStore> {
        self.workflows.read().unwrap_or_else(|e| e.into_inner())
    }

    fn store_mut(&self) -> RwLockWriteGuard<'_, WorkflowStore> {
        self.workflows.write().unwrap_or_else(|e| e.into_inner())
    }

    // ========================================================================
    // Agents
    // ========================================================================

    /// Register an agent under `name` (or its own name). Silently replaces
    /// an agent already registered under that name.
    pub fn register_agent(&self, agent: Arc<dyn Agent>, name: Option<&str>) -> String {
        let name = self.registry_mut().register(agent, name);
        tracing::info!("Registered agent: {}", name);
        name
    }

    /// Build and register an agent from a declared spec
    pub fn register_spec(&self, spec: &AgentSpec) -> String {
        self.register_agent(spec.build(), spec.name.as_deref())
    }

    /// Build and register a built-in agent by declared type name
    pub fn register_kind(&self, kind: &str, name: Option<&str>, config: &Kwargs) -> Result<String> {
        let kind: AgentKind = kind.parse()?;
        let spec = AgentSpec {
            kind,
            name: name.map(str::to_string),
            config: config.clone(),
        };
        Ok(self.register_spec(&spec))
    }

    /// Remove an agent; unknown names are ignored
    pub fn unregister_agent(&self, name: &str) {
        if self.registry_mut().unregister(name) {
            tracing::info!("Unregistered agent: {}", name);
        }
    }

    /// Names of all registered agents
    pub fn list_agents(&self) -> Vec<String> {
        self.registry().names()
    }

    /// Status snapshot of one agent
    pub fn agent_status(&self, name: &str) -> Result<AgentStatus> {
        self.registry()
            .get(name)
            .map(|agent| agent.status())
            .ok_or_else(|| OrchestratorError::AgentNotFound(name.to_string()))
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Invoke one agent and record the outcome.
    ///
    /// Never fails: an unknown agent, a handler error, a handler panic or an
    /// elapsed dispatch timeout all come back as a failed result. Exactly one
    /// history entry is appended per call.
    pub async fn dispatch(&self, agent_name: &str, task: &str, kwargs: Kwargs) -> DispatchResult {
        let agent = self.registry().get(agent_name);

        let result = match agent {
            Some(agent) => self.invoke(agent_name, agent, task, kwargs).await,
            None => {
                let error = OrchestratorError::AgentNotFound(agent_name.to_string());
                tracing::error!("{}", error);
                DispatchResult::error(error.to_string())
            }
        };

        self.history_log()
            .record(HistoryEntry::new(agent_name, task, result.clone()));

        result
    }

    async fn invoke(
        &self,
        agent_name: &str,
        agent: Arc<dyn Agent>,
        task: &str,
        kwargs: Kwargs,
    ) -> DispatchResult {
        tracing::debug!("Dispatching task '{}' to agent '{}'", task, agent_name);

        // Run on its own task so a panicking handler cannot take the
        // orchestrator down with it.
        let owned_task = task.to_string();
        let handle = tokio::spawn(async move { agent.execute(&owned_task, kwargs).await });

        let joined = match self.config.dispatch_timeout {
            Some(limit) => {
                let abort = handle.abort_handle();
                match tokio::time::timeout(limit, handle).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        abort.abort();
                        let error = format!(
                            "Agent '{}' timed out after {}ms",
                            agent_name,
                            limit.as_millis()
                        );
                        tracing::error!("{}", error);
                        return DispatchResult::failure(task, error);
                    }
                }
            }
            None => handle.await,
        };

        match joined {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                tracing::error!("Agent '{}' failed on task '{}': {}", agent_name, task, e);
                DispatchResult::failure(task, e.to_string())
            }
            Err(e) if e.is_panic() => {
                let error = format!(
                    "Agent '{}' panicked: {}",
                    agent_name,
                    panic_message(e.into_panic())
                );
                tracing::error!("{}", error);
                DispatchResult::failure(task, error)
            }
            Err(e) => {
                tracing::error!("Agent '{}' was cancelled: {}", agent_name, e);
                DispatchResult::failure(task, format!("Agent '{}' was cancelled", agent_name))
            }
        }
    }

    // ========================================================================
    // Chains
    // ========================================================================

    /// Run steps strictly in order.
    ///
    /// A step with `use_previous_result` receives the immediately preceding
    /// result under [`PREVIOUS_RESULT_KEY`]. A failed step without
    /// `continue_on_error` ends the chain; later steps are never dispatched.
    /// Returns the results produced so far.
    pub async fn execute_chain(&self, steps: &[ChainStep]) -> Vec<DispatchResult> {
        let mut results = Vec::with_capacity(steps.len());
        let mut previous: Option<DispatchResult> = None;

        for step in steps {
            let mut kwargs = step.kwargs.clone();
            if step.use_previous_result {
                if let Some(prev) = &previous {
                    kwargs.insert(PREVIOUS_RESULT_KEY.to_string(), prev.to_value());
                }
            }

            let result = self.dispatch(&step.agent, &step.task, kwargs).await;
            let halt = result.is_failure() && !step.continue_on_error;

            results.push(result.clone());
            previous = Some(result);

            if halt {
                tracing::warn!("Chain stopped at step {} due to failure", results.len());
                break;
            }
        }

        results
    }

    /// Run independent steps concurrently.
    ///
    /// No short-circuiting and no result forwarding; results come back in
    /// input order.
    pub async fn execute_parallel(&self, steps: &[ChainStep]) -> Vec<DispatchResult> {
        let futures = steps
            .iter()
            .map(|step| self.dispatch(&step.agent, &step.task, step.kwargs.clone()));

        join_all(futures).await
    }

    // ========================================================================
    // Workflows
    // ========================================================================

    /// Store `steps` as workflow `name`, replacing any existing one
    pub fn create_workflow(&self, name: &str, steps: Vec<ChainStep>) {
        let workflow = Workflow {
            name: name.to_string(),
            description: String::new(),
            steps,
        };
        self.add_workflow(workflow);
    }

    /// Store a full workflow definition, replacing any existing one
    pub fn add_workflow(&self, workflow: Workflow) {
        let name = workflow.name.clone();
        self.store_mut().create(workflow);
        tracing::info!("Created workflow: {}", name);
    }

    pub fn get_workflow(&self, name: &str) -> Option<Workflow> {
        self.store().get(name).cloned()
    }

    /// All stored workflows, sorted by name
    pub fn list_workflows(&self) -> Vec<Workflow> {
        self.store().list().into_iter().cloned().collect()
    }

    /// Run a stored workflow.
    ///
    /// Stored steps run exactly as recorded: `kwargs` is accepted for
    /// interface compatibility but not applied. An unknown name yields a
    /// single failed result.
    pub async fn run_workflow(&self, name: &str, kwargs: Kwargs) -> Vec<DispatchResult> {
        let steps = match self.store().get(name) {
            Some(workflow) => workflow.steps.clone(),
            None => {
                let error = OrchestratorError::WorkflowNotFound(name.to_string());
                tracing::error!("{}", error);
                return vec![DispatchResult::error(error.to_string())];
            }
        };

        if !kwargs.is_empty() {
            tracing::debug!("Ignoring {} kwargs passed to workflow '{}'", kwargs.len(), name);
        }

        self.execute_chain(&steps).await
    }

    // ========================================================================
    // History
    // ========================================================================

    /// Every recorded dispatch, oldest first
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history_log().all().to_vec()
    }

    pub fn clear_history(&self) {
        self.history_log().clear();
        tracing::info!("Execution history cleared");
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
