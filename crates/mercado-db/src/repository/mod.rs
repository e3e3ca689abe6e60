//! # Repositories
//!
//! Read and CRUD access to the store's tables, one repository per aggregate.
//! Repositories never touch `stock_levels` or `inventory_movements` outside
//! a read; all stock mutation goes through the ledger.

pub mod product;
pub mod sale;
pub mod user;

pub use product::{CatalogFilter, NewProduct, ProductRepository, UpdateProduct};
pub use sale::SaleRepository;
pub use user::{CodePurpose, CodeRecord, NewUser, UpdateUser, UserRepository};
