//! REST API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use maestro_agent::{AgentStatus, DispatchResult, Kwargs};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::AppState;
use crate::history::HistoryEntry;
use crate::workflow::{ChainStep, Workflow};

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

// ============================================================================
// Request types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterAgentRequest {
    pub agent_type: String,
    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub config: Kwargs,
}

#[derive(Debug, Deserialize)]
pub struct ExecuteAgentRequest {
    pub agent_name: String,
    pub task: String,
    #[serde(default)]
    pub kwargs: Kwargs,
}

#[derive(Debug, Deserialize)]
pub struct ChainRequest {
    pub chain: Vec<ChainStep>,
}

#[derive(Debug, Deserialize)]
pub struct ParallelRequest {
    pub tasks: Vec<ChainStep>,
}

#[derive(Debug, Deserialize)]
pub struct CreateWorkflowRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub steps: Vec<ChainStep>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RunWorkflowRequest {
    #[serde(default)]
    pub kwargs: Kwargs,
}

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct AgentsResponse {
    pub agents: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterAgentResponse {
    pub status: &'static str,
    pub agent_name: String,
    pub agent_type: String,
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub results: Vec<DispatchResult>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Serialize)]
pub struct WorkflowsResponse {
    pub workflows: Vec<Workflow>,
}

fn success_message(message: impl Into<String>) -> Json<Value> {
    Json(json!({"status": "success", "message": message.into()}))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Maestro Orchestrator API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /agents
pub async fn list_agents(State(state): State<AppState>) -> Json<AgentsResponse> {
    Json(AgentsResponse {
        agents: state.list_agents(),
    })
}

/// POST /agents/register
pub async fn register_agent(
    State(state): State<AppState>,
    Json(req): Json<RegisterAgentRequest>,
) -> Result<Json<RegisterAgentResponse>, ApiError> {
    let agent_type = req.agent_type.to_lowercase();

    match state.register_kind(&agent_type, req.agent_name.as_deref(), &req.config) {
        Ok(agent_name) => Ok(Json(RegisterAgentResponse {
            status: "success",
            agent_name,
            agent_type,
        })),
        Err(e) => {
            tracing::warn!("Rejected agent registration: {}", e);
            Err((StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string()))))
        }
    }
}

/// POST /agents/execute
pub async fn execute_agent(
    State(state): State<AppState>,
    Json(req): Json<ExecuteAgentRequest>,
) -> Result<Json<DispatchResult>, ApiError> {
    let result = state.dispatch(&req.agent_name, &req.task, req.kwargs).await;

    if let Some(error) = result.error_message() {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(error)),
        ));
    }

    Ok(Json(result))
}

/// POST /agents/chain
pub async fn execute_chain(
    State(state): State<AppState>,
    Json(req): Json<ChainRequest>,
) -> Json<ResultsResponse> {
    Json(ResultsResponse {
        results: state.execute_chain(&req.chain).await,
    })
}

/// POST /agents/parallel
pub async fn execute_parallel(
    State(state): State<AppState>,
    Json(req): Json<ParallelRequest>,
) -> Json<ResultsResponse> {
    Json(ResultsResponse {
        results: state.execute_parallel(&req.tasks).await,
    })
}

/// GET /agents/:name/status
pub async fn get_agent_status(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<AgentStatus>, ApiError> {
    state
        .agent_status(&name)
        .map(Json)
        .map_err(|e| (StatusCode::NOT_FOUND, Json(ErrorResponse::new(e.to_string()))))
}

/// DELETE /agents/:name
pub async fn unregister_agent(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<Value> {
    state.unregister_agent(&name);
    success_message(format!("Agent {} unregistered", name))
}

/// GET /history
pub async fn get_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        history: state.history(),
    })
}

/// DELETE /history
pub async fn clear_history(State(state): State<AppState>) -> Json<Value> {
    state.clear_history();
    success_message("History cleared")
}

/// GET /workflows
pub async fn list_workflows(State(state): State<AppState>) -> Json<WorkflowsResponse> {
    Json(WorkflowsResponse {
        workflows: state.list_workflows(),
    })
}

/// POST /workflows
pub async fn create_workflow(
    State(state): State<AppState>,
    Json(req): Json<CreateWorkflowRequest>,
) -> (StatusCode, Json<Value>) {
    let name = req.name.clone();
    state.add_workflow(Workflow {
        name: req.name,
        description: req.description,
        steps: req.steps,
    });
    (StatusCode::CREATED, success_message(format!("Workflow {} created", name)))
}

/// POST /workflows/:name/run
pub async fn run_workflow(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Option<Json<RunWorkflowRequest>>,
) -> Json<ResultsResponse> {
    let kwargs = body.map(|Json(req)| req.kwargs).unwrap_or_default();
    Json(ResultsResponse {
        results: state.run_workflow(&name, kwargs).await,
    })
}
