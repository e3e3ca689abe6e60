//! # User Repository
//!
//! User CRUD plus storage for the short-lived email codes used by the
//! verification and password-reset flows.
//!
//! ## Code Storage Contract
//! The repository stores code HASHES, never plaintext. Generating a code,
//! hashing it and comparing a submitted code against the stored hash all
//! happen in the auth layer; this module only persists and clears them.
//! Issuing a new code replaces the previous one, so at most one code per
//! purpose is live at a time.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use mercado_core::{Role, User};

use crate::error::{DbError, DbResult};

// =============================================================================
// Input Types
// =============================================================================

/// Fields for registering a user. The password arrives already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub address: Option<String>,
    pub birth_date: Option<String>,
    pub role: Role,
    pub id_number: Option<String>,
    /// Staff accounts created by an admin skip email verification.
    pub email_verified: bool,
}

/// Fields an admin may edit on a user. Password changes go through
/// [`UserRepository::set_password`].
#[derive(Debug, Clone)]
pub struct UpdateUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: Option<String>,
    pub birth_date: Option<String>,
    pub role: Role,
    pub id_number: Option<String>,
}

/// Which email-code flow a stored code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodePurpose {
    EmailVerification,
    PasswordReset,
}

impl CodePurpose {
    fn columns(self) -> (&'static str, &'static str) {
        match self {
            CodePurpose::EmailVerification => ("verification_code_hash", "verification_expires_at"),
            CodePurpose::PasswordReset => ("reset_code_hash", "reset_expires_at"),
        }
    }
}

/// The stored code state for one user and purpose.
#[derive(Debug, FromRow)]
pub struct CodeRecord {
    pub user_id: String,
    pub email_verified: bool,
    pub code_hash: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

// Columns that make up the public `User` record; the code columns stay out.
const USER_COLUMNS: &str = "id, first_name, last_name, email, password_hash, address, \
                            birth_date, role, id_number, email_verified, created_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for users.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Creates a user. A duplicate email surfaces as
    /// [`DbError::UniqueViolation`].
    pub async fn create(&self, new: NewUser) -> DbResult<User> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO users \
                 (id, first_name, last_name, email, password_hash, address, birth_date, \
                  role, id_number, email_verified, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )
        .bind(&id)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.address)
        .bind(&new.birth_date)
        .bind(new.role)
        .bind(&new.id_number)
        .bind(new.email_verified)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!(user_id = %id, email = %new.email, "User created");

        Ok(User {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            password_hash: new.password_hash,
            address: new.address,
            birth_date: new.birth_date,
            role: new.role,
            id_number: new.id_number,
            email_verified: new.email_verified,
            created_at: now,
        })
    }

    /// Fetches a user by id.
    pub async fn get(&self, id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Fetches a user by email (login lookup).
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Lists all users, newest first.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Updates a user's profile fields.
    pub async fn update(&self, id: &str, update: UpdateUser) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE users \
             SET first_name = ?1, last_name = ?2, email = ?3, address = ?4, \
                 birth_date = ?5, role = ?6, id_number = ?7 \
             WHERE id = ?8",
        )
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.email)
        .bind(&update.address)
        .bind(&update.birth_date)
        .bind(update.role)
        .bind(&update.id_number)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    /// Deletes a user. Fails with a foreign key violation if the user has
    /// sales or movements on record.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    // =========================================================================
    // Email Codes
    // =========================================================================

    /// Stores a new code hash for the given purpose, replacing any previous
    /// one.
    pub async fn set_code(
        &self,
        user_id: &str,
        purpose: CodePurpose,
        code_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> DbResult<()> {
        let (hash_col, expiry_col) = purpose.columns();

        let result = sqlx::query(&format!(
            "UPDATE users SET {hash_col} = ?1, {expiry_col} = ?2 WHERE id = ?3"
        ))
        .bind(code_hash)
        .bind(expires_at)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", user_id));
        }

        Ok(())
    }

    /// Fetches the stored code state for a user by email.
    pub async fn code_record(
        &self,
        email: &str,
        purpose: CodePurpose,
    ) -> DbResult<Option<CodeRecord>> {
        let (hash_col, expiry_col) = purpose.columns();

        let record = sqlx::query_as::<_, CodeRecord>(&format!(
            "SELECT id AS user_id, email_verified, \
                    {hash_col} AS code_hash, {expiry_col} AS expires_at \
             FROM users WHERE email = ?1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Marks the user's email verified and clears the verification code.
    pub async fn mark_email_verified(&self, user_id: &str) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE users \
             SET email_verified = 1, verification_code_hash = NULL, verification_expires_at = NULL \
             WHERE id = ?1",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", user_id));
        }

        Ok(())
    }

    /// Replaces the user's password hash and clears any reset code.
    pub async fn set_password(&self, user_id: &str, password_hash: &str) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE users \
             SET password_hash = ?1, reset_code_hash = NULL, reset_expires_at = NULL \
             WHERE id = ?2",
        )
        .bind(password_hash)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", user_id));
        }

        Ok(())
    }
}
