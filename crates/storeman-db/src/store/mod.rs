//! # Store Module
//!
//! Database store implementations for Storeman.
//!
//! ## Store Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Store Pattern Explained                            │
//! │                                                                         │
//! │  A store abstracts database access behind a clean, key/query API.      │
//! │                                                                         │
//! │  SaleService                                                           │
//! │       │                                                                 │
//! │       │  db.sales().find_by_payment_mode(PaymentMode::Cash)            │
//! │       ▼                                                                 │
//! │  SaleStore                                                             │
//! │  ├── save(&self, new_sale)                                             │
//! │  ├── find_by_id(&self, id)                                             │
//! │  ├── find_by_payment_mode(&self, mode)                                 │
//! │  └── delete_by_id(&self, id)                                           │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • SQL is isolated in one place                                        │
//! │  • Decimal TEXT ↔ rust_decimal conversion lives at this boundary       │
//! │  • Easy to test against an in-memory database                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Stores
//!
//! - [`product::ProductStore`] - Product lookup and upsert
//! - [`customer::CustomerStore`] - Customer lookup
//! - [`sale::SaleStore`] - Sale aggregate persistence and queries

pub mod customer;
pub mod product;
pub mod sale;

use rust_decimal::Decimal;

use crate::error::{DbError, DbResult};

/// Parses a decimal TEXT column fetched from SQLite.
///
/// Stored values are always written via `Decimal::to_string`, so a parse
/// failure means the row was modified outside the store layer.
pub(crate) fn parse_decimal(column: &str, value: &str) -> DbResult<Decimal> {
    value
        .parse::<Decimal>()
        .map_err(|e| DbError::Decode(format!("{column}: '{value}': {e}")))
}
