//! Shared helpers for integration tests: a file-backed scratch database and
//! seed functions. File-backed rather than in-memory so tests can open more
//! than one connection and exercise writer contention.
#![allow(dead_code)]

use mercado_core::{MovementDirection, Role};
use mercado_db::{AdjustmentRequest, Database, DbConfig, NewProduct, NewUser};
use uuid::Uuid;

/// Creates a fresh file-backed database in the system temp directory.
pub async fn test_db() -> Database {
    let path = std::env::temp_dir().join(format!("mercado-test-{}.db", Uuid::new_v4()));
    Database::new(DbConfig::new(path))
        .await
        .expect("test database")
}

/// Creates a user and returns its id.
pub async fn seed_user(db: &Database, role: Role) -> String {
    let user = db
        .users()
        .create(NewUser {
            first_name: "Ana".to_string(),
            last_name: "Prueba".to_string(),
            email: format!("{}@example.com", Uuid::new_v4()),
            password_hash: "not-a-real-hash".to_string(),
            address: None,
            birth_date: None,
            role,
            id_number: None,
            email_verified: true,
        })
        .await
        .expect("seed user");
    user.id
}

/// Creates an available product and returns its id.
pub async fn seed_product(db: &Database, name: &str, price_cents: i64) -> String {
    let product = db
        .products()
        .create(NewProduct {
            name: name.to_string(),
            description: None,
            price_cents,
            category_id: None,
            image_url: None,
            is_available: true,
        })
        .await
        .expect("seed product");
    product.id
}

/// Raises a product's stock via an inbound adjustment.
pub async fn seed_stock(db: &Database, product_id: &str, user_id: &str, quantity: i64) {
    db.ledger()
        .record_adjustment(AdjustmentRequest {
            product_id: product_id.to_string(),
            direction: MovementDirection::Inbound,
            quantity,
            document_ref: "SEED".to_string(),
            comment: None,
            user_id: user_id.to_string(),
        })
        .await
        .expect("seed stock");
}

/// Reads the current stock level, zero if no row exists.
pub async fn stock_of(db: &Database, product_id: &str) -> i64 {
    sqlx::query_scalar(
        "SELECT COALESCE((SELECT quantity FROM stock_levels WHERE product_id = ?1), 0)",
    )
    .bind(product_id)
    .fetch_one(db.pool())
    .await
    .expect("stock query")
}

/// Runs a COUNT(*) style query returning a single i64.
pub async fn count(db: &Database, sql: &str) -> i64 {
    sqlx::query_scalar(sql)
        .fetch_one(db.pool())
        .await
        .expect("count query")
}
