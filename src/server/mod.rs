//! HTTP surface: `/status`, `/leaderboard`, and `/run` over shared state.
//! Thin plumbing — requests are validated here, everything else lives in
//! the benchmark pipeline.

use crate::bench::{suite, ChunkingPolicy, RetrievalConfig};
use crate::cache::ModelRegistry;
use crate::config::{Config, RunDefaults};
use crate::error::{RagBenchError, Result};
use crate::store::{leaderboard, FsRunStore, RunRecord, RunStore};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state behind the route handlers.
pub struct AppState {
    pub config: Config,
    pub models: ModelRegistry,
    pub store: Arc<dyn RunStore>,
}

/// Body of `POST /run`. Every field is optional; omitted fields fall back to
/// the configured defaults. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RunRequest {
    pub chunk_strategy: Option<String>,
    pub chunk_size: Option<usize>,
    pub overlap: Option<usize>,
    pub embedding_model: Option<String>,
    /// Reranker model id; omit, empty, or "none" to disable reranking.
    pub reranker_model: Option<String>,
    /// Applied to both the retrieval and rerank stages.
    pub top_k: Option<usize>,
}

impl RunRequest {
    /// Resolve against the configured defaults and validate into a pipeline
    /// configuration. This is the single validation point; the pipeline
    /// trusts the result.
    pub fn into_retrieval_config(self, defaults: &RunDefaults) -> Result<RetrievalConfig> {
        let reranker_model = self
            .reranker_model
            .filter(|m| !m.trim().is_empty() && m != "none");
        let top_k = self.top_k.unwrap_or(defaults.top_k);

        let config = RetrievalConfig {
            chunking: ChunkingPolicy {
                strategy: self
                    .chunk_strategy
                    .unwrap_or_else(|| defaults.chunk_strategy.clone()),
                chunk_size: self.chunk_size.unwrap_or(defaults.chunk_size),
                overlap: self.overlap.unwrap_or(defaults.overlap),
            },
            embedding_model: self
                .embedding_model
                .unwrap_or_else(|| defaults.embedding_model.clone()),
            embedding_top_k: top_k,
            reranker_model,
            rerank_top_k: top_k,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Maps crate errors onto HTTP responses with a JSON error body.
struct ApiError(RagBenchError);

impl From<RagBenchError> for ApiError {
    fn from(err: RagBenchError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            RagBenchError::Config(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        log::error!("Request failed: {}", self.0);
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

async fn status() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<serde_json::Value>, ApiError> {
    let entries = leaderboard(state.store.as_ref())?;
    Ok(Json(json!({ "leaderboard": entries })))
}

async fn post_run(
    State(state): State<Arc<AppState>>,
    request: Option<Json<RunRequest>>,
) -> std::result::Result<Json<RunRecord>, ApiError> {
    let Json(request) = request.unwrap_or_default();
    let retrieval = request.into_retrieval_config(&state.config.defaults)?;

    let (id, record) = suite::execute_run(
        &state.config,
        &retrieval,
        &state.models,
        state.store.as_ref(),
    )
    .await?;

    log::info!("Completed run {} (overall F1 {:.2})", id, record.summary.overall_avg_f1);
    Ok(Json(record))
}

/// The benchmark HTTP server.
pub struct HttpServer {
    state: Arc<AppState>,
}

impl HttpServer {
    /// Wire up the store and model registry from the loaded configuration.
    pub fn new(config: Config) -> Result<Self> {
        let store = FsRunStore::new(&config.storage.runs_dir)?;
        let models = ModelRegistry::new(config.inference.clone());

        Ok(Self {
            state: Arc::new(AppState {
                store: Arc::new(store),
                models,
                config,
            }),
        })
    }

    /// Serve until the process is terminated.
    pub async fn run(&self) -> Result<()> {
        let app = self.router();
        let addr = format!("127.0.0.1:{}", self.state.config.server.port);

        log::info!("Starting RAGBench HTTP server on http://{}", addr);
        let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
            RagBenchError::Io(std::io::Error::new(
                std::io::ErrorKind::AddrInUse,
                format!("Failed to bind to {}: {}", addr, e),
            ))
        })?;

        axum::serve(listener, app).await.map_err(|e| {
            RagBenchError::Io(std::io::Error::other(format!("HTTP server error: {}", e)))
        })?;

        Ok(())
    }

    fn router(&self) -> Router {
        // No configured origins means allow any (local dev); otherwise
        // restrict preflight to exactly the configured list.
        let allowed = &self.state.config.server.allowed_origins;
        let cors = if allowed.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<axum::http::HeaderValue> =
                allowed.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .route("/status", get(status))
            .route("/leaderboard", get(get_leaderboard))
            .route("/run", post(post_run))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(cors),
            )
            .with_state(Arc::clone(&self.state))
    }
}
