//! # Order Routes
//!
//! Checkout and a customer's own sale history. The user id on an order
//! always comes from the session token, never from the request body.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use mercado_core::{OrderItem, Sale, SaleLineItem};
use mercado_db::{OrderReceipt, OrderRequest};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(place_order).get(list_own_orders))
        .route("/:id", get(get_order))
}

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub items: Vec<OrderItem>,
    /// The total the client showed the customer, in cents. Verified
    /// server-side against prices at time of sale.
    pub total_cents: i64,
    pub payment_method_id: String,
}

async fn place_order(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(body): Json<PlaceOrderRequest>,
) -> ApiResult<(StatusCode, Json<OrderReceipt>)> {
    let receipt = state
        .db
        .checkout()
        .place_order(OrderRequest {
            user_id: claims.sub,
            items: body.items,
            declared_total_cents: body.total_cents,
            payment_method_id: body.payment_method_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(receipt)))
}

async fn list_own_orders(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> ApiResult<Json<Vec<Sale>>> {
    let sales = state.db.sales().for_user(&claims.sub).await?;
    Ok(Json(sales))
}

#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub sale: Sale,
    pub items: Vec<SaleLineItem>,
}

/// A sale is visible to its owner and to staff; everyone else gets the same
/// 404 as for a sale that does not exist.
async fn get_order(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<OrderDetail>> {
    let sale = state
        .db
        .sales()
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Sale not found"))?;

    if sale.user_id != claims.sub && !claims.role.is_staff() {
        return Err(ApiError::not_found("Sale not found"));
    }

    let items = state.db.sales().line_items(&id).await?;
    Ok(Json(OrderDetail { sale, items }))
}
