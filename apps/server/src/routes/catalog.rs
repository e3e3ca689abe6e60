//! # Catalog Routes
//!
//! Public storefront reads: filtered product listing, category summaries
//! and payment methods. No authentication; nothing here mutates.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use mercado_core::{CatalogEntry, CategorySummary, PaymentMethod};
use mercado_db::CatalogFilter;

use crate::error::ApiResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_catalog))
        .route("/categories", get(list_categories))
        .route("/payment-methods", get(list_payment_methods))
}

#[derive(Debug, Deserialize, Default)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price_cents: Option<i64>,
    pub max_price_cents: Option<i64>,
}

async fn list_catalog(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> ApiResult<Json<Vec<CatalogEntry>>> {
    let filter = CatalogFilter {
        search: query.search,
        category: query.category,
        min_price_cents: query.min_price_cents,
        max_price_cents: query.max_price_cents,
    };

    let entries = state.db.products().catalog(&filter).await?;
    Ok(Json(entries))
}

async fn list_categories(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<CategorySummary>>> {
    let summaries = state.db.products().categories().await?;
    Ok(Json(summaries))
}

async fn list_payment_methods(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PaymentMethod>>> {
    let methods = state.db.sales().payment_methods().await?;
    Ok(Json(methods))
}
