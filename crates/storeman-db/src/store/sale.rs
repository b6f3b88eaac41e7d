//! # Sale Store
//!
//! Database operations for sales and sale items.
//!
//! ## Aggregate Persistence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Persistence                                  │
//! │                                                                         │
//! │  1. SAVE (one transaction)                                             │
//! │     └── INSERT sales row        → database assigns sale_id             │
//! │     └── INSERT sale_items row × N (back-referencing sale_id)           │
//! │     └── COMMIT                                                         │
//! │                                                                         │
//! │  2. HYDRATE                                                            │
//! │     └── sales LEFT JOIN customers  → header + customer summary         │
//! │     └── sale_items JOIN products   → lines + product summary           │
//! │                                                                         │
//! │  3. DELETE                                                             │
//! │     └── DELETE sales row → items cascade (foreign keys ON)             │
//! │     └── Silent no-op when the id does not exist                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sales are never updated in place: the aggregate is created whole, read
//! whole, and deleted whole.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::store::parse_decimal;
use storeman_core::{Customer, NewSale, PaymentMode, ProductRef, Sale, SaleItem, SaleType};

/// Sale header joined with its (possibly absent) customer.
#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    sale_id: i64,
    customer_id: Option<i64>,
    customer_name: Option<String>,
    mobile_number: Option<String>,
    address: Option<String>,
    sale_date: DateTime<Utc>,
    payment_mode: PaymentMode,
    sale_type: SaleType,
    gross_total: String,
}

/// Sale line joined with its product summary.
#[derive(Debug, sqlx::FromRow)]
struct SaleItemRow {
    item_id: i64,
    sale_id: i64,
    product_id: i64,
    product_code: String,
    product_name: String,
    quantity: String,
    price: String,
    total_price: String,
}

impl SaleItemRow {
    fn into_item(self) -> DbResult<SaleItem> {
        Ok(SaleItem {
            item_id: self.item_id,
            sale_id: self.sale_id,
            product: ProductRef {
                product_id: self.product_id,
                product_code: self.product_code,
                product_name: self.product_name,
            },
            quantity: parse_decimal("sale_items.quantity", &self.quantity)?,
            price: parse_decimal("sale_items.price", &self.price)?,
            total_price: parse_decimal("sale_items.total_price", &self.total_price)?,
        })
    }
}

/// Shared SELECT for sale headers. Query methods append their WHERE/ORDER.
const SELECT_SALES: &str = r#"
    SELECT
        s.sale_id,
        s.customer_id,
        c.customer_name,
        c.mobile_number,
        c.address,
        s.sale_date,
        s.payment_mode,
        s.sale_type,
        s.gross_total
    FROM sales s
    LEFT JOIN customers c ON c.customer_id = s.customer_id
"#;

/// Store for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleStore {
    pool: SqlitePool,
}

impl SaleStore {
    /// Creates a new SaleStore.
    pub fn new(pool: SqlitePool) -> Self {
        SaleStore { pool }
    }

    /// Persists a new sale with its items in one transaction and returns
    /// the hydrated aggregate.
    ///
    /// The database assigns the sale id and every item id; drafts carry
    /// no identity.
    pub async fn save(&self, new_sale: NewSale) -> DbResult<Sale> {
        debug!(
            customer_id = new_sale.customer_id,
            items = new_sale.items.len(),
            "Inserting sale"
        );

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO sales (customer_id, sale_date, payment_mode, sale_type, gross_total)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(new_sale.customer_id)
        .bind(new_sale.sale_date)
        .bind(new_sale.payment_mode)
        .bind(new_sale.sale_type)
        .bind(new_sale.gross_total.to_string())
        .execute(&mut *tx)
        .await?;

        let sale_id = result.last_insert_rowid();

        for item in &new_sale.items {
            sqlx::query(
                r#"
                INSERT INTO sale_items (sale_id, product_id, quantity, price, total_price)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(sale_id)
            .bind(item.product_id)
            .bind(item.quantity.to_string())
            .bind(item.price.to_string())
            .bind(item.total_price.to_string())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.find_by_id(sale_id)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", sale_id))
    }

    /// Finds a sale by ID, with customer and items hydrated.
    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sql = format!("{SELECT_SALES} WHERE s.sale_id = ?1");

        let row: Option<SaleRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    /// Returns all sales, ordered by id.
    pub async fn find_all(&self) -> DbResult<Vec<Sale>> {
        let sql = format!("{SELECT_SALES} ORDER BY s.sale_id");

        let rows: Vec<SaleRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        self.hydrate_all(rows).await
    }

    /// Returns all sales with the given payment mode, ordered by id.
    pub async fn find_by_payment_mode(&self, mode: PaymentMode) -> DbResult<Vec<Sale>> {
        let sql = format!("{SELECT_SALES} WHERE s.payment_mode = ?1 ORDER BY s.sale_id");

        let rows: Vec<SaleRow> = sqlx::query_as(&sql)
            .bind(mode)
            .fetch_all(&self.pool)
            .await?;

        self.hydrate_all(rows).await
    }

    /// Returns all sales with the given sale type, ordered by id.
    pub async fn find_by_sale_type(&self, sale_type: SaleType) -> DbResult<Vec<Sale>> {
        let sql = format!("{SELECT_SALES} WHERE s.sale_type = ?1 ORDER BY s.sale_id");

        let rows: Vec<SaleRow> = sqlx::query_as(&sql)
            .bind(sale_type)
            .fetch_all(&self.pool)
            .await?;

        self.hydrate_all(rows).await
    }

    /// Returns all sales whose customer name contains the fragment,
    /// case-insensitively, ordered by id.
    ///
    /// Uses `instr` rather than LIKE so `%`/`_` in the fragment are matched
    /// literally instead of acting as wildcards.
    pub async fn find_by_customer_name(&self, fragment: &str) -> DbResult<Vec<Sale>> {
        let sql = format!(
            "{SELECT_SALES} WHERE instr(lower(c.customer_name), lower(?1)) > 0 ORDER BY s.sale_id"
        );

        let rows: Vec<SaleRow> = sqlx::query_as(&sql)
            .bind(fragment)
            .fetch_all(&self.pool)
            .await?;

        self.hydrate_all(rows).await
    }

    /// Deletes a sale by ID; its items cascade.
    ///
    /// Silent no-op when the id does not exist (idempotent delete).
    pub async fn delete_by_id(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM sales WHERE sale_id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(id, rows = result.rows_affected(), "Deleted sale");
        Ok(())
    }

    /// Loads items for a header row and assembles the aggregate.
    async fn hydrate(&self, row: SaleRow) -> DbResult<Sale> {
        let item_rows: Vec<SaleItemRow> = sqlx::query_as(
            r#"
            SELECT
                si.item_id,
                si.sale_id,
                si.product_id,
                p.product_code,
                p.product_name,
                si.quantity,
                si.price,
                si.total_price
            FROM sale_items si
            JOIN products p ON p.product_id = si.product_id
            WHERE si.sale_id = ?1
            ORDER BY si.item_id
            "#,
        )
        .bind(row.sale_id)
        .fetch_all(&self.pool)
        .await?;

        let items = item_rows
            .into_iter()
            .map(SaleItemRow::into_item)
            .collect::<DbResult<Vec<_>>>()?;

        // customer_name is NOT NULL in the schema, so id+name are present or
        // absent together
        let customer = match (row.customer_id, row.customer_name) {
            (Some(customer_id), Some(customer_name)) => Some(Customer {
                customer_id,
                customer_name,
                mobile_number: row.mobile_number,
                address: row.address,
            }),
            _ => None,
        };

        Ok(Sale {
            sale_id: row.sale_id,
            customer,
            sale_date: row.sale_date,
            payment_mode: row.payment_mode,
            sale_type: row.sale_type,
            gross_total: parse_decimal("sales.gross_total", &row.gross_total)?,
            items,
        })
    }

    async fn hydrate_all(&self, rows: Vec<SaleRow>) -> DbResult<Vec<Sale>> {
        let mut sales = Vec::with_capacity(rows.len());
        for row in rows {
            sales.push(self.hydrate(row).await?);
        }
        Ok(sales)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
