//! # Product Routes (Back-office)
//!
//! Product and category management plus the inventory listing. Staff only;
//! storefront reads live under `/api/catalog`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use mercado_core::validation::{validate_price_cents, validate_product_name};
use mercado_core::{CatalogEntry, Category, Product};
use mercado_db::{NewProduct, UpdateProduct};

use crate::auth::StaffUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_inventory).post(create_product))
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/:id",
            put(update_product).get(get_product).delete(delete_product),
        )
}

/// Every product with its current stock, including delisted and
/// out-of-stock ones.
async fn list_inventory(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
) -> ApiResult<Json<Vec<CatalogEntry>>> {
    let entries = state.db.products().inventory().await?;
    Ok(Json(entries))
}

async fn get_product(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    let product = state
        .db
        .products()
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;
    Ok(Json(product))
}

#[derive(Debug, Deserialize)]
pub struct ProductBody {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub category_id: Option<String>,
    pub image_url: Option<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

async fn create_product(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Json(body): Json<ProductBody>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    validate_product_name(&body.name)?;
    validate_price_cents(body.price_cents)?;

    let product = state
        .db
        .products()
        .create(NewProduct {
            name: body.name,
            description: body.description,
            price_cents: body.price_cents,
            category_id: body.category_id,
            image_url: body.image_url,
            is_available: body.is_available,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

async fn update_product(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Path(id): Path<String>,
    Json(body): Json<ProductBody>,
) -> ApiResult<Json<Value>> {
    validate_product_name(&body.name)?;
    validate_price_cents(body.price_cents)?;

    state
        .db
        .products()
        .update(
            &id,
            UpdateProduct {
                name: body.name,
                description: body.description,
                price_cents: body.price_cents,
                category_id: body.category_id,
                image_url: body.image_url,
                is_available: body.is_available,
            },
        )
        .await?;

    Ok(Json(json!({ "message": "Product updated" })))
}

async fn delete_product(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.db.products().delete(&id).await?;
    Ok(Json(json!({ "message": "Product deleted" })))
}

// =============================================================================
// Categories
// =============================================================================

async fn list_categories(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
) -> ApiResult<Json<Vec<Category>>> {
    let categories = state.db.products().list_categories().await?;
    Ok(Json(categories))
}

#[derive(Debug, Deserialize)]
pub struct CategoryBody {
    pub name: String,
}

async fn create_category(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    Json(body): Json<CategoryBody>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    validate_product_name(&body.name)?;
    let category = state.db.products().create_category(&body.name).await?;
    Ok((StatusCode::CREATED, Json(category)))
}
