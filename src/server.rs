//! Knowledge base tool server.
//!
//! Exposes the tool protocol over a JSON HTTP API so a manager process can
//! request retrieval across a service boundary.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/mcp/v1/tools` | List available tools with input schemas |
//! | `POST` | `/mcp/v1/tools/execute` | Execute a tool: `{ "name", "arguments" }` |
//! | `GET`  | `/health` | Health check with loaded document count |
//! | `GET`  | `/` | Server name, version, and description |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "Missing required argument: query" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use doc_analyst_core::models::Corpus;
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::corpus::load_corpus;
use crate::protocol::{ToolCall, ToolError, ToolsListResponse};
use crate::tools::ToolRegistry;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Loaded knowledge base, read-only for the process lifetime.
    corpus: Arc<Corpus>,
    tools: Arc<ToolRegistry>,
}

impl AppState {
    /// State serving the built-in `document_retriever` over `corpus`.
    pub fn new(corpus: Arc<Corpus>, config: &Config) -> Self {
        let tools = ToolRegistry::with_builtins(corpus.clone(), config.retrieval.search_params());
        Self::with_tools(corpus, tools)
    }

    /// State serving an explicit registry.
    pub fn with_tools(corpus: Arc<Corpus>, tools: ToolRegistry) -> Self {
        Self {
            corpus,
            tools: Arc::new(tools),
        }
    }
}

/// Starts the tool server.
///
/// Loads the knowledge base from `[knowledge_base].path`, binds to
/// `[server].bind`, and serves until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let corpus = Arc::new(load_corpus(&config.knowledge_base.path));
    let state = AppState::new(corpus, config);

    let listener = TcpListener::bind(&config.server.bind).await?;
    tracing::info!(
        bind = %config.server.bind,
        final_limit = config.retrieval.final_limit,
        bonus_mode = config.retrieval.bonus_mode.as_str(),
        "tool server listening"
    );
    println!("MCP server listening on http://{}", config.server.bind);

    serve(listener, state).await
}

/// Serve the router on an already bound listener.
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Build the router with all routes and the CORS layer.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/mcp/v1/tools", get(handle_list_tools))
        .route("/mcp/v1/tools/execute", post(handle_execute))
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Converts a [`ToolError`] into an HTTP response.
struct AppError(ToolError);

impl From<ToolError> for AppError {
    fn from(err: ToolError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ToolError::NotFound(_) => StatusCode::NOT_FOUND,
            ToolError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ToolError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.0.code().to_string(),
                message: self.0.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}

// ============ GET / ============

#[derive(Serialize)]
struct RootResponse {
    name: String,
    version: String,
    description: String,
}

async fn handle_root() -> Json<RootResponse> {
    Json(RootResponse {
        name: "MCP Document Server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        description: "Model Context Protocol server for document retrieval".to_string(),
    })
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    documents_loaded: usize,
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        documents_loaded: state.corpus.len(),
    })
}

// ============ GET /mcp/v1/tools ============

async fn handle_list_tools(State(state): State<AppState>) -> Json<ToolsListResponse> {
    Json(ToolsListResponse {
        tools: state.tools.list(),
    })
}

// ============ POST /mcp/v1/tools/execute ============

/// Executes a tool call on the blocking pool.
///
/// Returns `404` for an unknown tool, `400` for invalid arguments, and
/// `500` if the tool fails or panics.
async fn handle_execute(
    State(state): State<AppState>,
    Json(call): Json<ToolCall>,
) -> Result<Json<serde_json::Value>, AppError> {
    let tools = state.tools.clone();
    let name = call.name.clone();

    let result = tokio::task::spawn_blocking(move || tools.execute(&call))
        .await
        .map_err(|e| ToolError::Internal(e.to_string()))?;

    match result {
        Ok(value) => Ok(Json(serde_json::json!({ "result": value }))),
        Err(err) => {
            tracing::warn!(tool = %name, error = %err, "tool call failed");
            Err(err.into())
        }
    }
}
