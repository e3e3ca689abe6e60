//! # Stock Ledger
//!
//! The single write path for inventory. Every change to a stock counter goes
//! through [`apply_movement`], which pairs the counter update with exactly
//! one append to the movement log inside the caller's transaction.
//!
//! ## Ledger Invariant
//! ```text
//! stock_levels.quantity == sum(inbound movements) - sum(outbound movements)
//! ```
//! The invariant holds at every commit point because the counter write and
//! the log append either both happen or neither does.
//!
//! ## Movement Anatomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  apply_movement(conn, movement)                                     │
//! │                                                                     │
//! │  1. INSERT OR IGNORE stock row    ← first write: competing          │
//! │     (created at quantity 0)         transactions queue here         │
//! │  2. SELECT quantity               ← now reading the latest value    │
//! │  3. outbound? check availability  ← reject oversell, nothing        │
//! │                                     written survives rollback       │
//! │  4. UPDATE stock_levels           ← counter                         │
//! │  5. INSERT inventory_movements    ← audit log, same transaction     │
//! │                                                                     │
//! │  Returns the new stock level.                                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//! Step 1 doubles as the serialization point: SQLite allows one writer at a
//! time, and because the first statement is a write, a concurrent mutator
//! blocks on the write lock BEFORE it can read a stock value that is about
//! to change. Two checkouts racing for the last units therefore see each
//! other's decrements, never a shared stale snapshot.

use chrono::Utc;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

use mercado_core::validation::{validate_document_ref, validate_quantity};
use mercado_core::{MovementDirection, MovementReason};

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Movement
// =============================================================================

/// One inventory movement, ready to be applied.
///
/// Built by the checkout engine (reason `Sale`) or from an
/// [`AdjustmentRequest`] (reasons `ManualIn` / `ManualOut`).
#[derive(Debug, Clone)]
pub(crate) struct Movement {
    pub product_id: String,
    /// Units moved; always positive, direction carries the sign.
    pub quantity: i64,
    pub direction: MovementDirection,
    pub reason: MovementReason,
    pub document_ref: String,
    pub comment: Option<String>,
    pub user_id: String,
}

/// A manual stock adjustment submitted by back-office staff.
#[derive(Debug, Clone)]
pub struct AdjustmentRequest {
    pub product_id: String,
    pub direction: MovementDirection,
    pub quantity: i64,
    /// Reference document (purchase order, damage report, count sheet).
    pub document_ref: String,
    pub comment: Option<String>,
    /// The staff member recording the adjustment.
    pub user_id: String,
}

// =============================================================================
// apply_movement
// =============================================================================

/// Applies one movement inside the caller's transaction.
///
/// Returns the stock level after the movement. On any error the caller's
/// transaction rolls back, so a failed movement leaves neither a counter
/// change nor a log row.
pub(crate) async fn apply_movement(
    conn: &mut SqliteConnection,
    movement: Movement,
) -> StoreResult<i64> {
    let now = Utc::now();

    // Ensure the stock row exists. Also the first write of the critical
    // section: a competing transaction queues on the write lock here.
    sqlx::query(
        "INSERT INTO stock_levels (product_id, quantity, updated_at)
         VALUES (?1, 0, ?2)
         ON CONFLICT(product_id) DO NOTHING",
    )
    .bind(&movement.product_id)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    let current: i64 =
        sqlx::query_scalar("SELECT quantity FROM stock_levels WHERE product_id = ?1")
            .bind(&movement.product_id)
            .fetch_one(&mut *conn)
            .await?;

    let new_quantity = match movement.direction {
        MovementDirection::Inbound => current + movement.quantity,
        MovementDirection::Outbound => {
            if current < movement.quantity {
                debug!(
                    product_id = %movement.product_id,
                    available = current,
                    requested = movement.quantity,
                    "Rejecting outbound movement: insufficient stock"
                );
                return Err(StoreError::InsufficientStock {
                    product_id: movement.product_id.clone(),
                    available: current,
                    requested: movement.quantity,
                });
            }
            current - movement.quantity
        }
    };

    sqlx::query("UPDATE stock_levels SET quantity = ?1, updated_at = ?2 WHERE product_id = ?3")
        .bind(new_quantity)
        .bind(now)
        .bind(&movement.product_id)
        .execute(&mut *conn)
        .await?;

    sqlx::query(
        "INSERT INTO inventory_movements
             (id, product_id, quantity, direction, reason, document_ref, comment, user_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&movement.product_id)
    .bind(movement.quantity)
    .bind(movement.direction)
    .bind(movement.reason)
    .bind(&movement.document_ref)
    .bind(&movement.comment)
    .bind(&movement.user_id)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(new_quantity)
}

// =============================================================================
// StockLedger
// =============================================================================

/// Entry point for manual stock adjustments.
#[derive(Debug, Clone)]
pub struct StockLedger {
    pool: SqlitePool,
}

impl StockLedger {
    pub fn new(pool: SqlitePool) -> Self {
        StockLedger { pool }
    }

    /// Records a manual inbound or outbound adjustment.
    ///
    /// Validates the request before opening a transaction, then applies the
    /// movement in one transaction of its own. Returns the new stock level.
    ///
    /// ## Errors
    /// - `Validation`: bad quantity or missing document reference; no rows
    ///   were written
    /// - `InsufficientStock`: outbound adjustment exceeds the current stock
    /// - `Unexpected`: unknown product (FK), connection trouble
    pub async fn record_adjustment(&self, request: AdjustmentRequest) -> StoreResult<i64> {
        validate_quantity(request.quantity)?;
        validate_document_ref(&request.document_ref)?;

        let reason = match request.direction {
            MovementDirection::Inbound => MovementReason::ManualIn,
            MovementDirection::Outbound => MovementReason::ManualOut,
        };

        let mut tx: Transaction<'_, Sqlite> = self.pool.begin().await?;

        let new_quantity = apply_movement(
            &mut tx,
            Movement {
                product_id: request.product_id.clone(),
                quantity: request.quantity,
                direction: request.direction,
                reason,
                document_ref: request.document_ref.clone(),
                comment: request.comment,
                user_id: request.user_id,
            },
        )
        .await?;

        tx.commit().await?;

        info!(
            product_id = %request.product_id,
            direction = ?request.direction,
            quantity = request.quantity,
            new_stock = new_quantity,
            document_ref = %request.document_ref,
            "Stock adjustment recorded"
        );

        Ok(new_quantity)
    }
}
