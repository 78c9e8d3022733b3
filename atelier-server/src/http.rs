//! Atelier HTTP REST API
//!
//! Axum-based HTTP server exposing the artisan directory. Each endpoint has a
//! thin axum handler that delegates to a pure inner function returning
//! `(StatusCode, serde_json::Value)`. The inner functions are directly testable
//! without axum dispatch machinery.
//!
//! This module holds the shared state, the error-to-HTTP mapping, the
//! service endpoints (`/health`, `/version`) and the server bootstrap. The
//! route table lives in [`crate::router`], resource handlers in
//! [`crate::handlers`].

use std::sync::Arc;

use anyhow::Result;
use atelier_core::{AtelierConfig, AtelierError, TradeCatalog};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::router::build_router;

/// Shared state for all HTTP handlers
#[derive(Clone)]
pub struct HttpState {
    pub pool: PgPool,
    pub config: AtelierConfig,
    pub trades: TradeCatalog,
}

impl HttpState {
    pub fn new(pool: PgPool, config: AtelierConfig) -> Self {
        let trades = TradeCatalog::new(config.trades.clone());
        Self {
            pool,
            config,
            trades,
        }
    }
}

/// Start the HTTP server on the configured address.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(
    pool: PgPool,
    config: AtelierConfig,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = format!("{}:{}", config.http.host, config.http.port);
    if config.auth.writes_open() {
        tracing::warn!("No auth.write_token configured: write endpoints are open to any client");
    }
    let state = Arc::new(HttpState::new(pool, config));

    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Atelier HTTP API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Error mapping
// ============================================================================

/// Standard HTTP error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            status: "error".to_string(),
        }
    }

    fn into_value(self) -> serde_json::Value {
        serde_json::json!({
            "error": self.error,
            "status": self.status,
        })
    }
}

/// Map a core error to its HTTP status and JSON body. Internal details are
/// logged, never returned.
pub fn error_to_http(err: &AtelierError) -> (StatusCode, serde_json::Value) {
    match err {
        AtelierError::Validation(fields) => {
            tracing::warn!(fields = %fields, "Request rejected by validation");
            (
                StatusCode::BAD_REQUEST,
                serde_json::json!({
                    "error": "validation failed",
                    "status": "error",
                    "fields": fields,
                }),
            )
        }
        AtelierError::NotFound { .. } => (
            StatusCode::NOT_FOUND,
            ErrorResponse::new(err.to_string()).into_value(),
        ),
        AtelierError::Unauthorized(msg) => {
            tracing::warn!("Write request refused: {}", msg);
            (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new(msg.clone()).into_value(),
            )
        }
        _ => {
            tracing::error!(error = %err, "Request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("internal server error").into_value(),
            )
        }
    }
}

/// Turn a handler result into `(status, body)`, using `ok` as the success status.
pub fn reply<T: Serialize>(
    result: std::result::Result<T, AtelierError>,
    ok: StatusCode,
) -> (StatusCode, serde_json::Value) {
    match result.and_then(|data| {
        serde_json::to_value(data).map_err(|e| AtelierError::Other(e.to_string()))
    }) {
        Ok(body) => (ok, body),
        Err(e) => error_to_http(&e),
    }
}

/// Render `(status, body)`; 204 responses carry no body.
pub fn respond((status, body): (StatusCode, serde_json::Value)) -> Response {
    if status == StatusCode::NO_CONTENT {
        status.into_response()
    } else {
        (status, Json(body)).into_response()
    }
}

/// Unwrap a numeric `{id}` path segment; a malformed id is reported on `id`.
pub fn path_id(
    path: std::result::Result<Path<i64>, PathRejection>,
) -> std::result::Result<i64, AtelierError> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => Err(AtelierError::invalid("id", rejection.body_text())),
    }
}

/// Unwrap a JSON body; parse failures become `non_field_errors`.
pub fn json_body<T>(
    body: std::result::Result<Json<T>, JsonRejection>,
) -> std::result::Result<T, AtelierError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(AtelierError::invalid("non_field_errors", rejection.body_text())),
    }
}

pub fn query_params<T>(
    query: std::result::Result<Query<T>, QueryRejection>,
) -> std::result::Result<T, AtelierError> {
    match query {
        Ok(Query(value)) => Ok(value),
        Err(rejection) => Err(AtelierError::invalid("non_field_errors", rejection.body_text())),
    }
}

// ============================================================================
// Service endpoints
// ============================================================================

/// Inner health check — queries DB and returns (status_code, json_body).
pub async fn health_inner(pool: &PgPool) -> (StatusCode, serde_json::Value) {
    match atelier_core::db::health_check(pool).await {
        Ok(pg_ver) => (
            StatusCode::OK,
            serde_json::json!({
                "status": "healthy",
                "version": env!("CARGO_PKG_VERSION"),
                "postgresql": pg_ver,
            }),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                serde_json::json!({
                    "status": "unhealthy",
                    "error": "database unavailable",
                }),
            )
        }
    }
}

/// Inner version — returns version info (pure, no IO).
pub fn version_inner() -> serde_json::Value {
    serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "api": "atelier/1",
    })
}

pub async fn health_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = health_inner(&state.pool).await;
    (status, Json(body))
}

pub async fn version_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(version_inner()))
}

pub async fn not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("not found").into_value()),
    )
}
