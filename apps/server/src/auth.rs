//! # Authentication
//!
//! JWT session tokens, argon2 password hashing, and the 6-digit email codes
//! used for verification and password reset.
//!
//! ## Code Handling
//! Codes are generated here, hashed with SHA-256 before storage, and
//! compared hash-to-hash on submission. The plaintext code exists only in
//! the email on its way to the user.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use mercado_core::Role;

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Claims & Tokens
// =============================================================================

/// JWT claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Email at time of issue
    pub email: String,

    /// Access role at time of issue
    pub role: Role,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Issues and validates session tokens; hashes passwords and email codes.
pub struct AuthService {
    secret: String,
    token_lifetime_secs: i64,
    /// Email code time-to-live.
    pub code_ttl: Duration,
}

impl AuthService {
    pub fn new(secret: String, token_lifetime_secs: i64, code_ttl_minutes: i64) -> Self {
        AuthService {
            secret,
            token_lifetime_secs,
            code_ttl: Duration::minutes(code_ttl_minutes),
        }
    }

    /// Generate a session token for a user.
    pub fn issue_token(&self, user_id: &str, email: &str, role: Role) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.token_lifetime_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|_| ApiError::internal())
    }

    /// Validate and decode a session token.
    pub fn verify_token(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| ApiError::unauthorized())
    }

    // =========================================================================
    // Passwords
    // =========================================================================

    /// Hashes a password with argon2 and a fresh random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, ApiError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| ApiError::internal())
    }

    /// Verifies a password against a stored hash.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        PasswordHash::new(stored_hash)
            .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
            .is_ok()
    }

    // =========================================================================
    // Email Codes
    // =========================================================================

    /// Generates a 6-digit code for email delivery.
    pub fn generate_code(&self) -> String {
        let code: u32 = rand::rng().random_range(100_000..1_000_000);
        code.to_string()
    }

    /// One-way hash of a code, as stored in the database.
    pub fn hash_code(&self, code: &str) -> String {
        format!("{:x}", Sha256::digest(code.as_bytes()))
    }
}

/// Extract bearer token from an authorization header value.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

// =============================================================================
// Extractors
// =============================================================================

/// Any authenticated user. Rejects with 401 when the token is missing,
/// malformed or expired.
pub struct AuthUser(pub Claims);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(ApiError::unauthorized)?;

        let token = extract_bearer_token(header).ok_or_else(ApiError::unauthorized)?;
        let claims = state.auth.verify_token(token)?;

        Ok(AuthUser(claims))
    }
}

/// A back-office user (admin or employee). 403 for customers.
pub struct StaffUser(pub Claims);

#[axum::async_trait]
impl FromRequestParts<AppState> for StaffUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        if !claims.role.is_staff() {
            return Err(ApiError::forbidden());
        }
        Ok(StaffUser(claims))
    }
}

/// An admin. 403 for everyone else.
pub struct AdminUser(pub Claims);

#[axum::async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        if claims.role != Role::Admin {
            return Err(ApiError::forbidden());
        }
        Ok(AdminUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new("test-secret".to_string(), 3600, 15)
    }

    #[test]
    fn test_jwt_roundtrip() {
        let auth = service();
        let token = auth
            .issue_token("user-1", "ana@example.com", Role::Customer)
            .unwrap();

        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "ana@example.com");
        assert_eq!(claims.role, Role::Customer);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let auth = service();
        let token = auth
            .issue_token("user-1", "ana@example.com", Role::Admin)
            .unwrap();

        let other = AuthService::new("other-secret".to_string(), 3600, 15);
        assert!(other.verify_token(&token).is_err());
    }

    #[test]
    fn test_password_hash_and_verify() {
        let auth = service();
        let hash = auth.hash_password("correct horse").unwrap();

        assert!(auth.verify_password("correct horse", &hash));
        assert!(!auth.verify_password("wrong horse", &hash));
        // Salted: hashing twice gives different strings.
        assert_ne!(hash, auth.hash_password("correct horse").unwrap());
    }

    #[test]
    fn test_code_shape_and_hash() {
        let auth = service();
        let code = auth.generate_code();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));

        // Deterministic hash, hex encoded.
        assert_eq!(auth.hash_code(&code), auth.hash_code(&code));
        assert_eq!(auth.hash_code(&code).len(), 64);
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }
}
