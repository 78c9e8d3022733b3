//! Route table.
//!
//! | verbs                   | path                       |
//! |-------------------------|----------------------------|
//! | GET, POST               | `/api/artisans/`           |
//! | GET, PUT, PATCH, DELETE | `/api/artisans/:id/`       |
//! | GET, POST               | `/api/commentaires/`       |
//! | GET, PUT, PATCH, DELETE | `/api/commentaires/:id/`   |
//! | GET                     | `/api/export-json/`        |
//! | GET                     | `/api/metiers/`            |
//! | GET                     | `/health`, `/version`      |

use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;

use crate::auth::require_write_token;
use crate::handlers::{artisans, comments, export};
use crate::http::{health_handler, not_found_handler, version_handler, HttpState};

/// Build the Axum router with all endpoints
pub fn build_router(state: Arc<HttpState>) -> Router {
    let api = Router::new()
        .route(
            "/artisans/",
            get(artisans::list_handler).post(artisans::create_handler),
        )
        .route(
            "/artisans/:id/",
            get(artisans::get_handler)
                .put(artisans::replace_handler)
                .patch(artisans::update_handler)
                .delete(artisans::delete_handler),
        )
        .route(
            "/commentaires/",
            get(comments::list_handler).post(comments::create_handler),
        )
        .route(
            "/commentaires/:id/",
            get(comments::get_handler)
                .put(comments::replace_handler)
                .patch(comments::update_handler)
                .delete(comments::delete_handler),
        )
        .route("/export-json/", get(export::export_handler))
        .route("/metiers/", get(export::metiers_handler))
        .route_layer(from_fn_with_state(state.clone(), require_write_token));

    Router::new()
        .nest("/api", api)
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        .fallback(not_found_handler)
        .with_state(state)
}
