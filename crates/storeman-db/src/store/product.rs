//! # Product Store
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Lookup by id (sale construction and stock deduction both resolve
//!   products through this path)
//! - Upsert via [`ProductStore::save`] (stock deduction writes back the
//!   adjusted quantity)
//!
//! Quantities are decimal TEXT columns; conversion to [`Decimal`] happens
//! here, at the store boundary.

use rust_decimal::Decimal;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::store::parse_decimal;
use storeman_core::Product;

/// Raw row shape; `quantity` is parsed into a [`Decimal`] on the way out.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    product_id: i64,
    product_code: String,
    product_name: String,
    quantity: String,
}

impl ProductRow {
    fn into_product(self) -> DbResult<Product> {
        Ok(Product {
            product_id: self.product_id,
            product_code: self.product_code,
            product_name: self.product_name,
            quantity: parse_decimal("products.quantity", &self.quantity)?,
        })
    }
}

/// Store for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let store = ProductStore::new(pool);
///
/// let product = store.find_by_id(1).await?;
/// store.save(&updated).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductStore {
    pool: SqlitePool,
}

impl ProductStore {
    /// Creates a new ProductStore.
    pub fn new(pool: SqlitePool) -> Self {
        ProductStore { pool }
    }

    /// Finds a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(
            r#"
            SELECT product_id, product_code, product_name, quantity
            FROM products
            WHERE product_id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ProductRow::into_product).transpose()
    }

    /// Saves a product, inserting or replacing by id (upsert).
    ///
    /// This is the write half of stock deduction: the adjusted quantity is
    /// persisted through here after a sale is recorded.
    pub async fn save(&self, product: &Product) -> DbResult<Product> {
        debug!(id = %product.product_id, quantity = %product.quantity, "Saving product");

        let quantity = product.quantity.to_string();

        sqlx::query(
            r#"
            INSERT INTO products (product_id, product_code, product_name, quantity)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(product_id) DO UPDATE SET
                product_code = excluded.product_code,
                product_name = excluded.product_name,
                quantity = excluded.quantity
            "#,
        )
        .bind(product.product_id)
        .bind(&product.product_code)
        .bind(&product.product_name)
        .bind(quantity)
        .execute(&self.pool)
        .await?;

        Ok(product.clone())
    }

    /// Inserts a new product, letting the database assign its id.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - Product code already exists
    pub async fn insert(
        &self,
        product_code: &str,
        product_name: &str,
        quantity: Decimal,
    ) -> DbResult<Product> {
        debug!(code = %product_code, "Inserting product");

        let result = sqlx::query(
            r#"
            INSERT INTO products (product_code, product_name, quantity)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(product_code)
        .bind(product_name)
        .bind(quantity.to_string())
        .execute(&self.pool)
        .await?;

        Ok(Product {
            product_id: result.last_insert_rowid(),
            product_code: product_code.to_string(),
            product_name: product_name.to_string(),
            quantity,
        })
    }

    /// Lists all products ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT product_id, product_code, product_name, quantity
            FROM products
            ORDER BY product_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
