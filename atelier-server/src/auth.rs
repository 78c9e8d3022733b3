//! Write access control.
//!
//! Reads are public. POST/PUT/PATCH/DELETE need `Authorization: Bearer <token>`
//! matching `auth.write_token` when one is configured.

use std::sync::Arc;

use atelier_core::config::AuthConfig;
use atelier_core::AtelierError;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, Method};
use axum::middleware::Next;
use axum::response::Response;

use crate::http::{error_to_http, respond, HttpState};

pub fn is_read_only(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Check the bearer token of a write request against the configuration.
pub fn check_write_token(auth: &AuthConfig, headers: &HeaderMap) -> Result<(), AtelierError> {
    let expected = match auth.write_token.as_deref().map(str::trim) {
        Some(token) if !token.is_empty() => token,
        _ => return Ok(()),
    };

    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);

    match presented {
        Some(token) if token == expected => Ok(()),
        Some(_) => Err(AtelierError::Unauthorized("invalid bearer token".to_string())),
        None => Err(AtelierError::Unauthorized("missing bearer token".to_string())),
    }
}

/// Middleware guarding every mutating route.
pub async fn require_write_token(
    State(state): State<Arc<HttpState>>,
    request: Request,
    next: Next,
) -> Response {
    if is_read_only(request.method()) {
        return next.run(request).await;
    }

    match check_write_token(&state.config.auth, request.headers()) {
        Ok(()) => next.run(request).await,
        Err(e) => respond(error_to_http(&e)),
    }
}
