//! # Database Migrations
//!
//! Schema migrations embedded at compile time from the `migrations/`
//! directory via `sqlx::migrate!`. Applied in order, tracked in the
//! `_sqlx_migrations` table, idempotent.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Runs all pending migrations against the given pool.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    debug!("Applying pending migrations");
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
