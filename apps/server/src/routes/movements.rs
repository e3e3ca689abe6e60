//! # Movement Routes (Back-office)
//!
//! Manual stock adjustments and the per-product audit log. The acting user
//! on an adjustment is taken from the session token.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use mercado_core::{InventoryMovement, MovementDirection};
use mercado_db::AdjustmentRequest;

use crate::auth::StaffUser;
use crate::error::ApiResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(record_adjustment).get(list_recent))
        .route("/product/:id", get(product_history))
}

const RECENT_MOVEMENTS_LIMIT: i64 = 200;

#[derive(Debug, Deserialize)]
pub struct AdjustmentBody {
    pub product_id: String,
    pub direction: MovementDirection,
    pub quantity: i64,
    pub document_ref: String,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AdjustmentResponse {
    pub product_id: String,
    pub new_stock: i64,
}

async fn record_adjustment(
    State(state): State<AppState>,
    StaffUser(claims): StaffUser,
    Json(body): Json<AdjustmentBody>,
) -> ApiResult<(StatusCode, Json<AdjustmentResponse>)> {
    let new_stock = state
        .db
        .ledger()
        .record_adjustment(AdjustmentRequest {
            product_id: body.product_id.clone(),
            direction: body.direction,
            quantity: body.quantity,
            document_ref: body.document_ref,
            comment: body.comment,
            user_id: claims.sub,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AdjustmentResponse {
            product_id: body.product_id,
            new_stock,
        }),
    ))
}

async fn list_recent(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
) -> ApiResult<Json<Vec<InventoryMovement>>> {
    let movements = state
        .db
        .sales()
        .recent_movements(RECENT_MOVEMENTS_LIMIT)
        .await?;
    Ok(Json(movements))
}

async fn product_history(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<InventoryMovement>>> {
    let movements = state.db.sales().movements_for_product(&id).await?;
    Ok(Json(movements))
}
