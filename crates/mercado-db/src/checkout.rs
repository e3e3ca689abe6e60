//! # Checkout Engine
//!
//! Turns a validated cart into a committed sale: header, line items with
//! frozen prices, and one outbound ledger movement per line, all inside a
//! single transaction.
//!
//! ## Transaction Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  place_order(request)                                               │
//! │                                                                     │
//! │  validate input (no I/O) ──── reject before any transaction         │
//! │       │                                                             │
//! │  BEGIN                                                              │
//! │  1. INSERT sale header        ← first write: competing checkouts    │
//! │                                 queue on the write lock here        │
//! │  2. for each item:                                                  │
//! │       SELECT price, stock     ← current price and latest stock      │
//! │       check availability      ← InsufficientStock aborts the order  │
//! │       INSERT sale_items       ← price frozen at time of sale        │
//! │       apply_movement outbound ← counter + audit row (ledger)        │
//! │  3. recompute total, compare with the client's figure               │
//! │  4. UPDATE sale header total                                        │
//! │  COMMIT  ── or ── any error → ROLLBACK, zero rows survive           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An order is all-or-nothing: if the fifth item is out of stock, the four
//! already-processed lines roll back with everything else. Cancellation
//! mid-flight is covered by sqlx rolling back the transaction on drop.

use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use mercado_core::validation::validate_order;
use mercado_core::{Money, MovementDirection, MovementReason, OrderItem, ValidationError};

use crate::error::{DbError, StoreError, StoreResult};
use crate::ledger::{apply_movement, Movement};

// =============================================================================
// Request / Receipt
// =============================================================================

/// An order submitted by the storefront.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    /// The customer placing the order.
    pub user_id: String,
    pub items: Vec<OrderItem>,
    /// The total the client displayed to the customer, in cents. Recomputed
    /// server-side from frozen prices; a mismatch rejects the order.
    pub declared_total_cents: i64,
    pub payment_method_id: String,
}

/// Confirmation of a committed sale.
#[derive(Debug, Clone, serde::Serialize)]
pub struct OrderReceipt {
    pub sale_id: String,
    /// The authoritative total, computed from prices at time of sale.
    pub total_cents: i64,
}

/// Price and stock for one product, read inside the checkout transaction.
#[derive(Debug, FromRow)]
struct ProductSnapshot {
    price_cents: i64,
    stock: i64,
}

// =============================================================================
// CheckoutEngine
// =============================================================================

/// The inventory-consistent sale transaction.
#[derive(Debug, Clone)]
pub struct CheckoutEngine {
    pool: SqlitePool,
}

impl CheckoutEngine {
    pub fn new(pool: SqlitePool) -> Self {
        CheckoutEngine { pool }
    }

    /// Places an order: atomically checks stock, freezes prices, decrements
    /// counters and logs one outbound movement per line.
    ///
    /// ## Errors
    /// - `Validation`: empty cart, bad quantity, missing payment method, or
    ///   a total that does not match the server-side recomputation
    /// - `InsufficientStock`: some line exceeds available stock; the whole
    ///   order is rolled back
    /// - `Unexpected`: unknown product, FK trouble, connection failure
    pub async fn place_order(&self, request: OrderRequest) -> StoreResult<OrderReceipt> {
        validate_order(&request.items, &request.payment_method_id)?;

        let sale_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        // Header first. Besides giving line items their FK target, this is
        // the transaction's first write, so concurrent checkouts serialize
        // before reading any stock. The total is provisional until step 4.
        sqlx::query(
            "INSERT INTO sales (id, user_id, payment_method_id, total_cents, created_at)
             VALUES (?1, ?2, ?3, 0, ?4)",
        )
        .bind(&sale_id)
        .bind(&request.user_id)
        .bind(&request.payment_method_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let mut total = Money::zero();

        for item in &request.items {
            let snapshot = sqlx::query_as::<_, ProductSnapshot>(
                "SELECT p.price_cents AS price_cents,
                        COALESCE(s.quantity, 0) AS stock
                 FROM products p
                 LEFT JOIN stock_levels s ON s.product_id = p.id
                 WHERE p.id = ?1 AND p.is_available = 1",
            )
            .bind(&item.product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Product", &item.product_id))?;

            if snapshot.stock < item.quantity {
                debug!(
                    sale_id = %sale_id,
                    product_id = %item.product_id,
                    available = snapshot.stock,
                    requested = item.quantity,
                    "Aborting order: insufficient stock"
                );
                return Err(StoreError::InsufficientStock {
                    product_id: item.product_id.clone(),
                    available: snapshot.stock,
                    requested: item.quantity,
                });
            }

            // Freeze the unit price on the line item.
            sqlx::query(
                "INSERT INTO sale_items (id, sale_id, product_id, quantity, unit_price_cents)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&sale_id)
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(snapshot.price_cents)
            .execute(&mut *tx)
            .await?;

            // The ledger re-checks availability; its verdict is the
            // authoritative one.
            apply_movement(
                &mut tx,
                Movement {
                    product_id: item.product_id.clone(),
                    quantity: item.quantity,
                    direction: MovementDirection::Outbound,
                    reason: MovementReason::Sale,
                    document_ref: sale_id.clone(),
                    comment: None,
                    user_id: request.user_id.clone(),
                },
            )
            .await?;

            total += Money::from_cents(snapshot.price_cents).times(item.quantity);
        }

        // The client's figure is advisory. A stale cart (price changed since
        // the page loaded) rejects the order rather than silently charging a
        // different amount.
        if total.cents() != request.declared_total_cents {
            debug!(
                sale_id = %sale_id,
                declared = request.declared_total_cents,
                computed = total.cents(),
                "Aborting order: total mismatch"
            );
            return Err(StoreError::Validation(ValidationError::TotalMismatch {
                declared_cents: request.declared_total_cents,
                computed_cents: total.cents(),
            }));
        }

        sqlx::query("UPDATE sales SET total_cents = ?1 WHERE id = ?2")
            .bind(total.cents())
            .bind(&sale_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            sale_id = %sale_id,
            user_id = %request.user_id,
            items = request.items.len(),
            total_cents = total.cents(),
            "Order committed"
        );

        Ok(OrderReceipt {
            sale_id,
            total_cents: total.cents(),
        })
    }
}
