//! # mercado-db: Database Layer
//!
//! SQLite persistence for Mercado: connection pool, embedded migrations,
//! repositories, and the two transactional write paths.
//!
//! ## Module Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         mercado-db                                  │
//! │                                                                     │
//! │  pool        DbConfig / Database (pool + migrations + accessors)    │
//! │  migrations  embedded schema migrations                             │
//! │  error       DbError, StoreError taxonomy                           │
//! │                                                                     │
//! │  Write paths (the only code that mutates stock):                    │
//! │    ledger    apply_movement + StockLedger (manual adjustments)      │
//! │    checkout  CheckoutEngine::place_order                            │
//! │                                                                     │
//! │  Reads / CRUD:                                                      │
//! │    repository::product   catalog, inventory, product CRUD           │
//! │    repository::sale      sales, line items, movement log            │
//! │    repository::user      users + email code storage                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

pub mod checkout;
pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use checkout::{CheckoutEngine, OrderReceipt, OrderRequest};
pub use error::{DbError, DbResult, StoreError, StoreResult};
pub use ledger::{AdjustmentRequest, StockLedger};
pub use pool::{Database, DbConfig};
pub use repository::product::{CatalogFilter, NewProduct, ProductRepository, UpdateProduct};
pub use repository::sale::SaleRepository;
pub use repository::user::{CodePurpose, CodeRecord, NewUser, UpdateUser, UserRepository};
