//! `/api/commentaires/` — comment CRUD.

use std::sync::Arc;

use atelier_core::models::CommentInput;
use atelier_core::store::comments;
use atelier_core::validation::{validate_comment_patch, validate_new_comment};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use sqlx::PgPool;

use crate::http::{error_to_http, json_body, path_id, reply, respond, HttpState};

pub async fn list_inner(pool: &PgPool) -> (StatusCode, serde_json::Value) {
    reply(comments::list(pool).await, StatusCode::OK)
}

pub async fn get_inner(pool: &PgPool, id: i64) -> (StatusCode, serde_json::Value) {
    reply(comments::get(pool, id).await, StatusCode::OK)
}

/// A missing or unknown `artisan` comes back as a 400 on the `artisan` field.
pub async fn create_inner(pool: &PgPool, input: CommentInput) -> (StatusCode, serde_json::Value) {
    let new = match validate_new_comment(input) {
        Ok(c) => c,
        Err(e) => return error_to_http(&e),
    };
    reply(comments::create(pool, &new).await, StatusCode::CREATED)
}

pub async fn replace_inner(
    pool: &PgPool,
    id: i64,
    input: CommentInput,
) -> (StatusCode, serde_json::Value) {
    let new = match validate_new_comment(input) {
        Ok(c) => c,
        Err(e) => return error_to_http(&e),
    };
    reply(comments::replace(pool, id, &new).await, StatusCode::OK)
}

pub async fn update_inner(
    pool: &PgPool,
    id: i64,
    input: CommentInput,
) -> (StatusCode, serde_json::Value) {
    let patch = match validate_comment_patch(input) {
        Ok(p) => p,
        Err(e) => return error_to_http(&e),
    };
    reply(comments::update(pool, id, &patch).await, StatusCode::OK)
}

pub async fn delete_inner(pool: &PgPool, id: i64) -> (StatusCode, serde_json::Value) {
    match comments::delete(pool, id).await {
        Ok(()) => (StatusCode::NO_CONTENT, serde_json::Value::Null),
        Err(e) => error_to_http(&e),
    }
}

pub async fn list_handler(State(state): State<Arc<HttpState>>) -> Response {
    respond(list_inner(&state.pool).await)
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
    body: Result<Json<CommentInput>, JsonRejection>,
) -> Response {
    match json_body(body) {
        Ok(input) => respond(create_inner(&state.pool, input).await),
        Err(e) => respond(error_to_http(&e)),
    }
}

pub async fn replace_handler(
    State(state): State<Arc<HttpState>>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<CommentInput>, JsonRejection>,
) -> Response {
    match path_id(path).and_then(|id| Ok((id, json_body(body)?))) {
        Ok((id, input)) => respond(replace_inner(&state.pool, id, input).await),
        Err(e) => respond(error_to_http(&e)),
    }
}

pub async fn update_handler(
    State(state): State<Arc<HttpState>>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<CommentInput>, JsonRejection>,
) -> Response {
    match path_id(path).and_then(|id| Ok((id, json_body(body)?))) {
        Ok((id, input)) => respond(update_inner(&state.pool, id, input).await),
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
