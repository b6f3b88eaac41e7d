//! # Customer Store
//!
//! Database operations for customers. The sale flow only reads customers;
//! creation exists for onboarding and test seeding.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use storeman_core::Customer;

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    customer_id: i64,
    customer_name: String,
    mobile_number: Option<String>,
    address: Option<String>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            customer_id: row.customer_id,
            customer_name: row.customer_name,
            mobile_number: row.mobile_number,
            address: row.address,
        }
    }
}

/// Store for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerStore {
    pool: SqlitePool,
}

impl CustomerStore {
    /// Creates a new CustomerStore.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerStore { pool }
    }

    /// Finds a customer by ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Customer))` - Customer found
    /// * `Ok(None)` - Customer not found
    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<Customer>> {
        let row: Option<CustomerRow> = sqlx::query_as(
            r#"
            SELECT customer_id, customer_name, mobile_number, address
            FROM customers
            WHERE customer_id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Customer::from))
    }

    /// Inserts a new customer, letting the database assign its id.
    pub async fn insert(
        &self,
        customer_name: &str,
        mobile_number: Option<&str>,
        address: Option<&str>,
    ) -> DbResult<Customer> {
        debug!(name = %customer_name, "Inserting customer");

        let result = sqlx::query(
            r#"
            INSERT INTO customers (customer_name, mobile_number, address)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(customer_name)
        .bind(mobile_number)
        .bind(address)
        .execute(&self.pool)
        .await?;

        Ok(Customer {
            customer_id: result.last_insert_rowid(),
            customer_name: customer_name.to_string(),
            mobile_number: mobile_number.map(str::to_string),
            address: address.map(str::to_string),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
