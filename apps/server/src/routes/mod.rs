//! # HTTP Routes
//!
//! ```text
//! /health                     liveness probe
//! /api/auth/...               register, login, email codes      (public)
//! /api/catalog/...            storefront reads                  (public)
//! /api/orders/...             checkout + own sales              (any user)
//! /api/products/...           catalog management + inventory    (staff)
//! /api/movements/...          manual adjustments + audit log    (staff)
//! /api/users/...              user administration               (admin)
//! ```

pub mod auth;
pub mod catalog;
pub mod movements;
pub mod orders;
pub mod products;
pub mod users;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::state::AppState;

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth::router())
        .nest("/api/catalog", catalog::router())
        .nest("/api/orders", orders::router())
        .nest("/api/products", products::router())
        .nest("/api/movements", movements::router())
        .nest("/api/users", users::router())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
