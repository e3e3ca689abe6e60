//! # User Administration Routes
//!
//! Admin-only CRUD. Accounts created here (staff or customer) skip email
//! verification; self-service signup lives under `/api/auth/register`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use mercado_core::validation::validate_email;
use mercado_core::{Role, User};
use mercado_db::{NewUser, UpdateUser};

use crate::auth::AdminUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

async fn list_users(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
) -> ApiResult<Json<Vec<User>>> {
    let users = state.db.users().list().await?;
    Ok(Json(users))
}

async fn get_user(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    let user = state
        .db
        .users()
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub address: Option<String>,
    pub birth_date: Option<String>,
    pub id_number: Option<String>,
}

async fn create_user(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Json(body): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    validate_email(&body.email)?;
    if body.password.len() < 8 {
        return Err(ApiError::bad_request(
            "Password must be at least 8 characters",
        ));
    }

    let password_hash = state.auth.hash_password(&body.password)?;

    let user = state
        .db
        .users()
        .create(NewUser {
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            password_hash,
            address: body.address,
            birth_date: body.birth_date,
            role: body.role,
            id_number: body.id_number,
            email_verified: true,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub address: Option<String>,
    pub birth_date: Option<String>,
    pub id_number: Option<String>,
}

async fn update_user(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateUserRequest>,
) -> ApiResult<Json<Value>> {
    validate_email(&body.email)?;

    state
        .db
        .users()
        .update(
            &id,
            UpdateUser {
                first_name: body.first_name,
                last_name: body.last_name,
                email: body.email,
                address: body.address,
                birth_date: body.birth_date,
                role: body.role,
                id_number: body.id_number,
            },
        )
        .await?;

    Ok(Json(json!({ "message": "User updated" })))
}

/// Admins cannot delete their own account; everything else is fair game
/// until the user owns sales or movements, which the FK constraints protect.
async fn delete_user(
    State(state): State<AppState>,
    AdminUser(claims): AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    if claims.sub == id {
        return Err(ApiError::bad_request("Cannot delete your own account"));
    }

    state.db.users().delete(&id).await?;
    Ok(Json(json!({ "message": "User deleted" })))
}
