//! `/api/artisans/` — tradesperson CRUD with exact-match filters.

use std::sync::Arc;

use atelier_core::models::{ArtisanFilter, ArtisanInput};
use atelier_core::store::artisans;
use atelier_core::validation::{validate_artisan_patch, validate_filter, validate_new_artisan};
use atelier_core::TradeCatalog;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use sqlx::PgPool;

use crate::http::{error_to_http, json_body, path_id, query_params, reply, respond, HttpState};

// ============================================================================
// Inner functions
// ============================================================================

pub async fn list_inner(
    pool: &PgPool,
    trades: &TradeCatalog,
    filter: ArtisanFilter,
) -> (StatusCode, serde_json::Value) {
    let filter = match validate_filter(filter, trades) {
        Ok(f) => f,
        Err(e) => return error_to_http(&e),
    };
    reply(artisans::list(pool, &filter).await, StatusCode::OK)
}

pub async fn get_inner(pool: &PgPool, id: i64) -> (StatusCode, serde_json::Value) {
    reply(artisans::get(pool, id).await, StatusCode::OK)
}

pub async fn create_inner(
    pool: &PgPool,
    trades: &TradeCatalog,
    input: ArtisanInput,
) -> (StatusCode, serde_json::Value) {
    let new = match validate_new_artisan(input, trades) {
        Ok(a) => a,
        Err(e) => return error_to_http(&e),
    };
    reply(artisans::create(pool, &new).await, StatusCode::CREATED)
}

pub async fn replace_inner(
    pool: &PgPool,
    trades: &TradeCatalog,
    id: i64,
    input: ArtisanInput,
) -> (StatusCode, serde_json::Value) {
    let new = match validate_new_artisan(input, trades) {
        Ok(a) => a,
        Err(e) => return error_to_http(&e),
    };
    reply(artisans::replace(pool, id, &new).await, StatusCode::OK)
}

pub async fn update_inner(
    pool: &PgPool,
    trades: &TradeCatalog,
    id: i64,
    input: ArtisanInput,
) -> (StatusCode, serde_json::Value) {
    let patch = match validate_artisan_patch(input, trades) {
        Ok(p) => p,
        Err(e) => return error_to_http(&e),
    };
    reply(artisans::update(pool, id, &patch).await, StatusCode::OK)
}

pub async fn delete_inner(pool: &PgPool, id: i64) -> (StatusCode, serde_json::Value) {
    match artisans::delete(pool, id).await {
        Ok(()) => (StatusCode::NO_CONTENT, serde_json::Value::Null),
        Err(e) => error_to_http(&e),
    }
}

// ============================================================================
// Axum handler wrappers
// ============================================================================

pub async fn list_handler(
    State(state): State<Arc<HttpState>>,
    query: Result<Query<ArtisanFilter>, QueryRejection>,
) -> Response {
    match query_params(query) {
        Ok(filter) => respond(list_inner(&state.pool, &state.trades, filter).await),
        Err(e) => respond(error_to_http(&e)),
    }
}

pub async fn get_handler(
    State(state): State<Arc<HttpState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Response {
    match path_id(path) {
        Ok(id) => respond(get_inner(&state.pool, id).await),
        Err(e) => respond(error_to_http(&e)),
    }
}

pub async fn create_handler(
    State(state): State<Arc<HttpState>>,
    body: Result<Json<ArtisanInput>, JsonRejection>,
) -> Response {
    match json_body(body) {
        Ok(input) => respond(create_inner(&state.pool, &state.trades, input).await),
        Err(e) => respond(error_to_http(&e)),
    }
}

pub async fn replace_handler(
    State(state): State<Arc<HttpState>>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<ArtisanInput>, JsonRejection>,
) -> Response {
    match path_id(path).and_then(|id| Ok((id, json_body(body)?))) {
        Ok((id, input)) => respond(replace_inner(&state.pool, &state.trades, id, input).await),
        Err(e) => respond(error_to_http(&e)),
    }
}

pub async fn update_handler(
    State(state): State<Arc<HttpState>>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<ArtisanInput>, JsonRejection>,
) -> Response {
    match path_id(path).and_then(|id| Ok((id, json_body(body)?))) {
        Ok((id, input)) => respond(update_inner(&state.pool, &state.trades, id, input).await),
        Err(e) => respond(error_to_http(&e)),
    }
}

pub async fn delete_handler(
    State(state): State<Arc<HttpState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Response {
    match path_id(path) {
        Ok(id) => respond(delete_inner(&state.pool, id).await),
        Err(e) => respond(error_to_http(&e)),
    }
}
