//! # Product Repository
//!
//! Catalog reads (storefront and back-office) and product CRUD.
//!
//! ## Two Views of the Catalog
//! - `catalog()` is the storefront view: available products with stock > 0,
//!   optionally filtered by search text, category and price range
//! - `inventory()` is the back-office view: every product, including
//!   unavailable ones and those at zero stock

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use mercado_core::{CatalogEntry, Category, CategorySummary, Product};

use crate::error::{DbError, DbResult};

// =============================================================================
// Input Types
// =============================================================================

/// Filters for the storefront catalog listing. All fields optional; filters
/// compose with AND.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    /// Case-insensitive substring match on the product name.
    pub search: Option<String>,
    /// Category name (not id; the storefront filters by display name).
    pub category: Option<String>,
    pub min_price_cents: Option<i64>,
    pub max_price_cents: Option<i64>,
}

/// Fields for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub category_id: Option<String>,
    pub image_url: Option<String>,
    pub is_available: bool,
}

/// Fields for updating a product (full replace).
#[derive(Debug, Clone)]
pub struct UpdateProduct {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub category_id: Option<String>,
    pub image_url: Option<String>,
    pub is_available: bool,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for products and categories.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    // =========================================================================
    // Storefront Reads
    // =========================================================================

    /// Lists the storefront catalog: available products with stock, joined
    /// with category name and current quantity.
    pub async fn catalog(&self, filter: &CatalogFilter) -> DbResult<Vec<CatalogEntry>> {
        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT p.id, p.name, p.description, p.price_cents, \
                    c.name AS category, p.image_url, s.quantity AS stock \
             FROM products p \
             JOIN stock_levels s ON s.product_id = p.id \
             LEFT JOIN categories c ON c.id = p.category_id \
             WHERE p.is_available = 1 AND s.quantity > 0",
        );

        if let Some(search) = &filter.search {
            query.push(" AND p.name LIKE ");
            query.push_bind(format!("%{}%", search));
        }
        if let Some(category) = &filter.category {
            query.push(" AND c.name = ");
            query.push_bind(category.as_str());
        }
        if let Some(min) = filter.min_price_cents {
            query.push(" AND p.price_cents >= ");
            query.push_bind(min);
        }
        if let Some(max) = filter.max_price_cents {
            query.push(" AND p.price_cents <= ");
            query.push_bind(max);
        }

        query.push(" ORDER BY p.name");

        let entries = query
            .build_query_as::<CatalogEntry>()
            .fetch_all(&self.pool)
            .await?;

        debug!(count = entries.len(), "Catalog listed");
        Ok(entries)
    }

    /// Lists category names with the number of purchasable products in each.
    /// Categories whose products are all out of stock are omitted.
    pub async fn categories(&self) -> DbResult<Vec<CategorySummary>> {
        let summaries = sqlx::query_as::<_, CategorySummary>(
            "SELECT c.name AS name, COUNT(p.id) AS product_count \
             FROM categories c \
             JOIN products p ON p.category_id = c.id AND p.is_available = 1 \
             JOIN stock_levels s ON s.product_id = p.id AND s.quantity > 0 \
             GROUP BY c.name \
             ORDER BY c.name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }

    // =========================================================================
    // Back-office Reads
    // =========================================================================

    /// Lists every product with its current stock (zero if no movement has
    /// ever touched it). The back-office inventory table.
    pub async fn inventory(&self) -> DbResult<Vec<CatalogEntry>> {
        let entries = sqlx::query_as::<_, CatalogEntry>(
            "SELECT p.id, p.name, p.description, p.price_cents, \
                    c.name AS category, p.image_url, \
                    COALESCE(s.quantity, 0) AS stock \
             FROM products p \
             LEFT JOIN stock_levels s ON s.product_id = p.id \
             LEFT JOIN categories c ON c.id = p.category_id \
             ORDER BY p.name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Fetches a product by id.
    pub async fn get(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    // =========================================================================
    // CRUD
    // =========================================================================

    /// Creates a product and returns it.
    pub async fn create(&self, new: NewProduct) -> DbResult<Product> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO products \
                 (id, name, description, price_cents, category_id, image_url, is_available, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
        )
        .bind(&id)
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price_cents)
        .bind(&new.category_id)
        .bind(&new.image_url)
        .bind(new.is_available)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!(product_id = %id, name = %new.name, "Product created");

        Ok(Product {
            id,
            name: new.name,
            description: new.description,
            price_cents: new.price_cents,
            category_id: new.category_id,
            image_url: new.image_url,
            is_available: new.is_available,
            created_at: now,
            updated_at: now,
        })
    }

    /// Updates a product (full replace of its editable fields).
    ///
    /// Price changes never rewrite committed sales; line items carry their
    /// own frozen unit price.
    pub async fn update(&self, id: &str, update: UpdateProduct) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE products \
             SET name = ?1, description = ?2, price_cents = ?3, category_id = ?4, \
                 image_url = ?5, is_available = ?6, updated_at = ?7 \
             WHERE id = ?8",
        )
        .bind(&update.name)
        .bind(&update.description)
        .bind(update.price_cents)
        .bind(&update.category_id)
        .bind(&update.image_url)
        .bind(update.is_available)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Deletes a product. Fails with a foreign key violation if the product
    /// appears in any sale or movement; such products should be marked
    /// unavailable instead.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM stock_levels WHERE product_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        tx.commit().await?;
        Ok(())
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Lists all categories.
    pub async fn list_categories(&self) -> DbResult<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(categories)
    }

    /// Creates a category.
    pub async fn create_category(&self, name: &str) -> DbResult<Category> {
        let id = Uuid::new_v4().to_string();

        sqlx::query("INSERT INTO categories (id, name) VALUES (?1, ?2)")
            .bind(&id)
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(Category {
            id,
            name: name.to_string(),
        })
    }
}
