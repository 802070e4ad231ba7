//! HTTP boundary for the directory.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/advocates` | Search, paginate (`page`, `pageSize`, `searchText`, `orderBy`) |
//! | `POST` | `/seed` | Insert the bootstrap dataset |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! Storage failures are answered with HTTP 200 and `{ "ok": false }`; the
//! underlying error is logged and never sent to the client. Invalid
//! parameters are rejected with HTTP 400 and
//! `{ "ok": false, "message": "..." }` naming the offending parameter.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so a browser front end
//! served from elsewhere can call the API.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::assemble;
use crate::config::Config;
use crate::db;
use crate::error::DirectoryError;
use crate::migrate;
use crate::models::{AdvocatePage, Failure, SeedResponse};
use crate::query::{OrderBy, PageRequest, Predicate};
use crate::seed;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pool: SqlitePool,
}

/// Starts the HTTP server.
///
/// Opens the database, applies the schema once, and serves until the
/// process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let pool = db::connect(config).await?;
    migrate::run_migrations(&pool).await?;

    let app = router(AppState {
        config: Arc::new(config.clone()),
        pool,
    });

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(bind = %bind_addr, "directory server listening");
    println!("Directory server listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Builds the router with CORS and request tracing applied.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/advocates", get(handle_list_advocates))
        .route("/seed", post(handle_seed))
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

/// Internal error type that converts into the uniform failure body.
enum AppError {
    /// Caller error; the message is safe to return.
    Rejected(String),
    /// Anything else; only `{ ok: false }` crosses the boundary.
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Rejected(message) => {
                (StatusCode::BAD_REQUEST, Json(Failure::rejected(message))).into_response()
            }
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                (StatusCode::OK, Json(Failure::generic())).into_response()
            }
        }
    }
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::Validation(message) => AppError::Rejected(message),
            other => AppError::Internal(other.to_string()),
        }
    }
}

// ============ GET /advocates ============

/// Raw query parameters. Kept as strings so malformed numbers become our own
/// validation error instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListParams {
    page: Option<String>,
    page_size: Option<String>,
    search_text: Option<String>,
    order_by: Option<String>,
}

/// Handler for `GET /advocates`.
async fn handle_list_advocates(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<AdvocatePage>, AppError> {
    let Query(params) = params.map_err(|rejection| AppError::Rejected(rejection.body_text()))?;
    let request = PageRequest::parse(
        params.page.as_deref(),
        params.page_size.as_deref(),
        &state.config.pagination,
    )?;
    let order_by = match params.order_by.as_deref() {
        Some(raw) => raw.parse::<OrderBy>()?,
        None => OrderBy::default(),
    };
    let predicate = Predicate::build(params.search_text.as_deref());

    let result = assemble::fetch_page(
        &state.pool,
        &predicate,
        request,
        order_by,
        &state.config.search,
    )
    .await?;

    Ok(Json(result.into_wire()))
}

// ============ POST /seed ============

/// Handler for `POST /seed`.
async fn handle_seed(State(state): State<AppState>) -> Result<Json<SeedResponse>, AppError> {
    let advocates = seed::run_seed(&state.pool)
        .await
        .map_err(|e| AppError::Internal(format!("{:#}", e)))?;
    Ok(Json(SeedResponse { advocates }))
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
