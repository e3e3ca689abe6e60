//! # mercado-core: Pure Business Logic for Mercado
//!
//! Domain types and rules for a single-store retail backend: catalog,
//! stock movements, checkout and users.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Mercado Architecture                        │
//! │                                                                 │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │                 apps/server (axum HTTP API)               │  │
//! │  │   auth, catalog, checkout, movements, admin routes        │  │
//! │  └───────────────────────────┬───────────────────────────────┘  │
//! │                              │                                  │
//! │  ┌───────────────────────────▼───────────────────────────────┐  │
//! │  │              ★ mercado-core (THIS CRATE) ★                │  │
//! │  │                                                           │  │
//! │  │   types: Product, Sale, InventoryMovement, User, ...      │  │
//! │  │   money: integer-cents arithmetic                         │  │
//! │  │   validation: order / adjustment input rules              │  │
//! │  │                                                           │  │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS      │  │
//! │  └───────────────────────────┬───────────────────────────────┘  │
//! │                              │                                  │
//! │  ┌───────────────────────────▼───────────────────────────────┐  │
//! │  │              mercado-db (storage layer)                   │  │
//! │  │   stock ledger, checkout engine, repositories             │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, InventoryMovement, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation for orders and stock adjustments

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

pub use error::ValidationError;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct line items allowed in a single order.
///
/// Prevents runaway carts and keeps checkout transactions short.
pub const MAX_ORDER_ITEMS: usize = 100;

/// Maximum quantity of a single product in one order line.
///
/// Catches obvious typos (1000 instead of 10) before any storage access.
pub const MAX_LINE_QUANTITY: i64 = 999;
