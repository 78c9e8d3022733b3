//! Offline export (`/api/export-json/`) and the trade list (`/api/metiers/`).

use std::sync::Arc;

use atelier_core::store::artisans;
use atelier_core::TradeCatalog;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use sqlx::PgPool;

use crate::http::{reply, respond, HttpState};

/// Every artisan with its comments, ordered by id. Re-serialised on every call.
pub async fn export_inner(pool: &PgPool) -> (StatusCode, serde_json::Value) {
    reply(artisans::export_all(pool).await, StatusCode::OK)
}

pub fn metiers_inner(trades: &TradeCatalog) -> serde_json::Value {
    serde_json::json!(trades.trades())
}

pub async fn export_handler(State(state): State<Arc<HttpState>>) -> Response {
    respond(export_inner(&state.pool).await)
}

pub async fn metiers_handler(State(state): State<Arc<HttpState>>) -> Response {
    respond((StatusCode::OK, metiers_inner(&state.trades)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::Trade;

    #[test]
    fn metiers_lists_configured_trades_in_order() {
        let catalog = TradeCatalog::new(vec![
            Trade::new("soudeur", "Soudeur"),
            Trade::new("macon", "Maçon"),
        ]);
        let body = metiers_inner(&catalog);

        assert_eq!(body.as_array().map(Vec::len), Some(2));
        assert_eq!(body[0]["code"], "soudeur");
        assert_eq!(body[1]["libelle"], "Maçon");
    }
}
