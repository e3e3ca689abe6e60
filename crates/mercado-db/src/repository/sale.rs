//! # Sale Repository
//!
//! Reads over committed sales and the movement log. Sales are immutable;
//! there is no update or delete here by design.

use sqlx::SqlitePool;

use mercado_core::{InventoryMovement, PaymentMethod, Sale, SaleLineItem};

use crate::error::DbResult;

/// Repository for sales, line items and the movement log.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Fetches a sale by id.
    pub async fn get(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>("SELECT * FROM sales WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Lists a user's sales, newest first.
    pub async fn for_user(&self, user_id: &str) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            "SELECT * FROM sales WHERE user_id = ?1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Lists the line items of a sale, with their frozen unit prices.
    pub async fn line_items(&self, sale_id: &str) -> DbResult<Vec<SaleLineItem>> {
        let items =
            sqlx::query_as::<_, SaleLineItem>("SELECT * FROM sale_items WHERE sale_id = ?1")
                .bind(sale_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(items)
    }

    /// Lists the movement history of a product, newest first. The back-office
    /// audit view; summing inbound minus outbound here must always equal the
    /// product's current stock level.
    pub async fn movements_for_product(&self, product_id: &str) -> DbResult<Vec<InventoryMovement>> {
        let movements = sqlx::query_as::<_, InventoryMovement>(
            "SELECT * FROM inventory_movements \
             WHERE product_id = ?1 \
             ORDER BY created_at DESC, id",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    /// Lists the most recent movements across all products, newest first.
    pub async fn recent_movements(&self, limit: i64) -> DbResult<Vec<InventoryMovement>> {
        let movements = sqlx::query_as::<_, InventoryMovement>(
            "SELECT * FROM inventory_movements \
             ORDER BY created_at DESC, id \
             LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    /// Lists the payment methods offered at checkout.
    pub async fn payment_methods(&self) -> DbResult<Vec<PaymentMethod>> {
        let methods =
            sqlx::query_as::<_, PaymentMethod>("SELECT id, name FROM payment_methods ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(methods)
    }
}
