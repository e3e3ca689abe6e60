//! # Auth Routes
//!
//! Registration, login, and the two email-code flows (verification and
//! password reset).
//!
//! ## Enumeration Hygiene
//! The code endpoints answer the same way whether or not the email exists;
//! whether an account is registered is not observable from outside.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use mercado_core::validation::validate_email;
use mercado_core::{Role, User};
use mercado_db::{CodePurpose, CodeRecord, NewUser};

use crate::auth::AuthService;
use crate::error::{ApiError, ApiResult};
use crate::mailer::CodeEmail;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/verify-email", post(verify_email))
        .route("/resend-code", post(resend_code))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
}

const MIN_PASSWORD_LEN: usize = 8;

fn validate_password(password: &str) -> ApiResult<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Hash/expiry check shared by both code flows. The error is deliberately
/// the same for every failure mode.
fn check_code(record: &CodeRecord, auth: &AuthService, submitted: &str) -> ApiResult<()> {
    let invalid = || ApiError::bad_request("Invalid or expired code");

    let stored_hash = record.code_hash.as_deref().ok_or_else(invalid)?;
    let expires_at = record.expires_at.ok_or_else(invalid)?;

    if Utc::now() > expires_at {
        return Err(invalid());
    }
    if auth.hash_code(submitted) != stored_hash {
        return Err(invalid());
    }

    Ok(())
}

// =============================================================================
// Registration
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub address: Option<String>,
    pub birth_date: Option<String>,
    pub id_number: Option<String>,
}

/// Creates a customer account and sends a verification code. The account
/// cannot log in until the code is confirmed.
async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    validate_email(&body.email)?;
    validate_password(&body.password)?;

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
            role: Role::Customer,
            id_number: body.id_number,
            email_verified: false,
        })
        .await?;

    let code = state.auth.generate_code();
    state
        .db
        .users()
        .set_code(
            &user.id,
            CodePurpose::EmailVerification,
            &state.auth.hash_code(&code),
            Utc::now() + state.auth.code_ttl,
        )
        .await?;
    state
        .mailer
        .send_code(&user.email, CodeEmail::Verification, &code);

    info!(user_id = %user.id, "Customer registered, verification pending");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Account created; check your email for a verification code" })),
    ))
}

// =============================================================================
// Login
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    // Same 401 for unknown email and wrong password.
    let user = state
        .db
        .users()
        .find_by_email(&body.email)
        .await?
        .ok_or_else(ApiError::unauthorized)?;

    if !state.auth.verify_password(&body.password, &user.password_hash) {
        return Err(ApiError::unauthorized());
    }

    if !user.email_verified {
        return Err(ApiError::new(
            StatusCode::FORBIDDEN,
            "email_not_verified",
            "Verify your email before logging in",
        ));
    }

    let token = state.auth.issue_token(&user.id, &user.email, user.role)?;

    info!(user_id = %user.id, "Login");
    Ok(Json(LoginResponse { token, user }))
}

// =============================================================================
// Email Verification
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CodeSubmission {
    pub email: String,
    pub code: String,
}

async fn verify_email(
    State(state): State<AppState>,
    Json(body): Json<CodeSubmission>,
) -> ApiResult<Json<Value>> {
    let record = state
        .db
        .users()
        .code_record(&body.email, CodePurpose::EmailVerification)
        .await?
        .ok_or_else(|| ApiError::bad_request("Invalid or expired code"))?;

    if record.email_verified {
        return Ok(Json(json!({ "message": "Email already verified" })));
    }

    check_code(&record, &state.auth, &body.code)?;
    state.db.users().mark_email_verified(&record.user_id).await?;

    info!(user_id = %record.user_id, "Email verified");
    Ok(Json(json!({ "message": "Email verified" })))
}

#[derive(Debug, Deserialize)]
pub struct EmailOnly {
    pub email: String,
}

async fn resend_code(
    State(state): State<AppState>,
    Json(body): Json<EmailOnly>,
) -> ApiResult<Json<Value>> {
    if let Some(user) = state.db.users().find_by_email(&body.email).await? {
        if !user.email_verified {
            let code = state.auth.generate_code();
            state
                .db
                .users()
                .set_code(
                    &user.id,
                    CodePurpose::EmailVerification,
                    &state.auth.hash_code(&code),
                    Utc::now() + state.auth.code_ttl,
                )
                .await?;
            state
                .mailer
                .send_code(&user.email, CodeEmail::Verification, &code);
        }
    }

    Ok(Json(
        json!({ "message": "If the account exists, a code has been sent" }),
    ))
}

// =============================================================================
// Password Reset
// =============================================================================

async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<EmailOnly>,
) -> ApiResult<Json<Value>> {
    if let Some(user) = state.db.users().find_by_email(&body.email).await? {
        let code = state.auth.generate_code();
        state
            .db
            .users()
            .set_code(
                &user.id,
                CodePurpose::PasswordReset,
                &state.auth.hash_code(&code),
                Utc::now() + state.auth.code_ttl,
            )
            .await?;
        state
            .mailer
            .send_code(&user.email, CodeEmail::PasswordReset, &code);
    }

    Ok(Json(
        json!({ "message": "If the account exists, a code has been sent" }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> ApiResult<Json<Value>> {
    validate_password(&body.new_password)?;

    let record = state
        .db
        .users()
        .code_record(&body.email, CodePurpose::PasswordReset)
        .await?
        .ok_or_else(|| ApiError::bad_request("Invalid or expired code"))?;

    check_code(&record, &state.auth, &body.code)?;

    let password_hash = state.auth.hash_password(&body.new_password)?;
    state
        .db
        .users()
        .set_password(&record.user_id, &password_hash)
        .await?;

    info!(user_id = %record.user_id, "Password reset");
    Ok(Json(json!({ "message": "Password updated" })))
}
