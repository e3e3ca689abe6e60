//! # Domain Types
//!
//! Core domain types used throughout Mercado.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Catalog            Checkout              Inventory                 │
//! │  ─────────          ─────────             ──────────                │
//! │  Product            Sale                  StockLevel (1:1 product)  │
//! │  Category           SaleLineItem          InventoryMovement         │
//! │                     OrderItem (input)       (append-only log)       │
//! │                     PaymentMethod                                   │
//! │                                                                     │
//! │  Actors: User { role: Admin | Employee | Customer }                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stock Ownership
//! Stock is NOT a field on `Product`. It lives in `StockLevel`, keyed by
//! product id, and is mutated exclusively by the stock ledger in mercado-db.
//! Every mutation is paired with one `InventoryMovement` row, so at any point
//! `StockLevel.quantity == sum(inbound) - sum(outbound)`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Catalog
// =============================================================================

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// A product available for sale.
///
/// Stock intentionally absent; see [`StockLevel`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown in the storefront and on receipts.
    pub name: String,

    /// Optional long description.
    pub description: Option<String>,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Category this product belongs to.
    pub category_id: Option<String>,

    /// Image reference (URL or object key).
    pub image_url: Option<String>,

    /// Whether the product can currently be sold.
    pub is_available: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// A storefront catalog row: product joined with its current stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub stock: i64,
}

/// A category with the number of in-stock products it contains.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CategorySummary {
    pub name: String,
    pub product_count: i64,
}

// =============================================================================
// Inventory
// =============================================================================

/// Current stock counter for a product (1:1 with `Product`).
///
/// Created implicitly at quantity 0 the first time a movement touches the
/// product; never observably negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockLevel {
    pub product_id: String,
    pub quantity: i64,
    pub updated_at: DateTime<Utc>,
}

/// Direction of an inventory movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum MovementDirection {
    /// Stock entering the store (receiving, corrections up).
    Inbound,
    /// Stock leaving the store (sales, damage, corrections down).
    Outbound,
}

/// Why a movement happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum MovementReason {
    /// Outbound movement produced by a checkout.
    Sale,
    /// Operator-recorded receiving / correction up.
    ManualIn,
    /// Operator-recorded loss / correction down.
    ManualOut,
}

/// One entry in the append-only inventory movement log.
///
/// Rows are never updated or deleted; the log is the audit trail that the
/// stock counters can always be reconciled against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryMovement {
    pub id: String,
    pub product_id: String,
    /// Units moved; always positive, direction carries the sign.
    pub quantity: i64,
    pub direction: MovementDirection,
    pub reason: MovementReason,
    /// Reference document: sale id for sales, PO/adjustment number for
    /// manual movements.
    pub document_ref: String,
    /// Operator comment (manual movements only).
    pub comment: Option<String>,
    /// The user who caused the movement.
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Checkout
// =============================================================================

/// A payment method accepted at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PaymentMethod {
    pub id: String,
    pub name: String,
}

/// One line of an incoming order, as submitted by the storefront.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    pub quantity: i64,
}

/// A committed sale.
///
/// Immutable after creation: there is no update or delete path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    pub user_id: String,
    pub payment_method_id: String,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A line item of a committed sale.
///
/// Uses the snapshot pattern: `unit_price_cents` is the price at the time
/// of sale, so later catalog price changes never rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLineItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
}

impl SaleLineItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns quantity × unit price as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().times(self.quantity)
    }
}

// =============================================================================
// Users
// =============================================================================

/// Access role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
    Customer,
}

impl Role {
    /// Back-office roles may manage catalog and inventory.
    #[inline]
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Employee)
    }
}

/// A registered user.
///
/// The password hash and verification state travel with the record but are
/// only interpreted by the auth layer; the core flows treat a user purely
/// as the actor reference attached to sales and movements.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub address: Option<String>,
    pub birth_date: Option<String>,
    pub role: Role,
    pub id_number: Option<String>,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total_uses_snapshot_price() {
        let line = SaleLineItem {
            id: "l1".to_string(),
            sale_id: "s1".to_string(),
            product_id: "p1".to_string(),
            quantity: 3,
            unit_price_cents: 10_000,
        };
        assert_eq!(line.line_total().cents(), 30_000);
    }

    #[test]
    fn test_role_is_staff() {
        assert!(Role::Admin.is_staff());
        assert!(Role::Employee.is_staff());
        assert!(!Role::Customer.is_staff());
    }

    #[test]
    fn test_direction_serde_names() {
        let json = serde_json::to_string(&MovementDirection::Inbound).unwrap();
        assert_eq!(json, "\"inbound\"");
        let json = serde_json::to_string(&MovementReason::ManualIn).unwrap();
        assert_eq!(json, "\"manual_in\"");
    }
}
