//! REST adapter over the orchestrator
//!
//! Thin transport layer: every handler calls one orchestrator operation and
//! serializes its structured result without reinterpreting it.

pub mod api;

use anyhow::Result;
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::engine::Orchestrator;

/// Shared application state
pub type AppState = Arc<Orchestrator>;

/// Configuration for the web server
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

/// Start the web server
pub async fn serve(orchestrator: AppState, config: WebConfig) -> Result<()> {
    let app = create_router(orchestrator);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!("Starting web server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(api::root))
        // Agents
        .route("/agents", get(api::list_agents))
        .route("/agents/register", post(api::register_agent))
        .route("/agents/execute", post(api::execute_agent))
        .route("/agents/chain", post(api::execute_chain))
        .route("/agents/parallel", post(api::execute_parallel))
        .route("/agents/:name/status", get(api::get_agent_status))
        .route("/agents/:name", delete(api::unregister_agent))
        // History
        .route("/history", get(api::get_history).delete(api::clear_history))
        // Workflows
        .route("/workflows", get(api::list_workflows).post(api::create_workflow))
        .route("/workflows/:name/run", post(api::run_workflow))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
