//! # Domain Types
//!
//! Core domain types used throughout Storeman.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    SaleItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  product_id     │   │  sale_id        │   │  item_id        │       │
//! │  │  product_code   │   │  customer       │   │  sale_id (back) │       │
//! │  │  product_name   │   │  payment_mode   │   │  product (ref)  │       │
//! │  │  quantity       │   │  items (owned)  │   │  quantity/price │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │   PaymentMode   │   │    SaleType     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  customer_id    │   │  Cash           │   │  Retail         │       │
//! │  │  customer_name  │   │  Online         │   │  Wholesale      │       │
//! │  │  mobile/address │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Aggregate Ownership
//! A [`Sale`] exclusively owns its [`SaleItem`]s (composition). Items hold a
//! non-owning back-reference by `sale_id`, never a cyclic object link. Sale
//! identity is assigned by the store on creation and never supplied by callers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Product
// =============================================================================

/// A product held in stock and available for sale.
///
/// The only mutation this model supports is stock deduction performed as a
/// side effect of recording a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier, assigned by the store.
    pub product_id: i64,

    /// Business code shown on labels and receipts.
    pub product_code: String,

    /// Display name.
    pub product_name: String,

    /// Quantity on hand. Non-negative by invariant; a sale that would push
    /// it below zero is rejected with `InsufficientStock`.
    pub quantity: Decimal,
}

// =============================================================================
// Customer
// =============================================================================

/// A customer. Read-only in the sale recording flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier, assigned by the store.
    pub customer_id: i64,

    /// Full name. Sales can be looked up by a case-insensitive substring
    /// of this field.
    pub customer_name: String,

    /// Contact number, if recorded.
    pub mobile_number: Option<String>,

    /// Postal address, if recorded.
    pub address: Option<String>,
}

// =============================================================================
// Payment Mode
// =============================================================================

/// Closed set of accepted payment methods for a sale.
///
/// Canonical names are uppercase (`CASH`, `ONLINE`); [`PaymentMode::from_name`]
/// resolves names case-insensitively and yields `None` for unknown input so
/// both the strict and the fallback lookup paths can reuse it.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMode {
    /// Physical cash payment.
    Cash,
    /// Online transfer or wallet payment.
    Online,
}

impl PaymentMode {
    /// Every enumerator, in declaration order.
    pub const ALL: [PaymentMode; 2] = [PaymentMode::Cash, PaymentMode::Online];

    /// Canonical uppercase name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "CASH",
            PaymentMode::Online => "ONLINE",
        }
    }

    /// Case-insensitive name lookup. Unknown names are `None`, not an error.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Sale Type
// =============================================================================

/// Closed set of transaction categories.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SaleType {
    /// Single-customer storefront sale.
    Retail,
    /// Bulk sale at wholesale pricing.
    Wholesale,
}

impl SaleType {
    /// Every enumerator, in declaration order.
    pub const ALL: [SaleType; 2] = [SaleType::Retail, SaleType::Wholesale];

    /// Canonical uppercase name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SaleType::Retail => "RETAIL",
            SaleType::Wholesale => "WHOLESALE",
        }
    }

    /// Case-insensitive name lookup. Unknown names are `None`, not an error.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for SaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Sale
// =============================================================================

/// One recorded transaction associating a customer, payment/sale type, and
/// the purchased items.
///
/// The aggregate owns its items; they are created with the sale, never
/// updated in place, and deleted only when the whole sale is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    /// Unique identifier, assigned by the store on creation.
    pub sale_id: i64,

    /// The customer this sale was recorded for. Absent when the customer
    /// record has since been removed.
    pub customer: Option<Customer>,

    /// When the sale took place. Defaults to the current time when the
    /// caller does not supply one.
    pub sale_date: DateTime<Utc>,

    pub payment_mode: PaymentMode,

    pub sale_type: SaleType,

    /// Gross total across all items.
    pub gross_total: Decimal,

    /// Line items, in insertion order.
    pub items: Vec<SaleItem>,
}

// =============================================================================
// Sale Item
// =============================================================================

/// Denormalized product summary carried by a sale line.
///
/// Only identity and naming; stock levels live on [`Product`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRef {
    pub product_id: i64,
    pub product_code: String,
    pub product_name: String,
}

/// One line within a sale: a product, quantity, and pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItem {
    /// Unique identifier, assigned by the store.
    pub item_id: i64,

    /// Back-reference to the owning sale.
    pub sale_id: i64,

    /// The product sold on this line.
    pub product: ProductRef,

    /// Quantity sold. Deducted from the product's stock after the sale
    /// is persisted.
    pub quantity: Decimal,

    /// Unit price.
    pub price: Decimal,

    /// Line total as supplied by the caller.
    pub total_price: Decimal,
}

// =============================================================================
// Drafts
// =============================================================================

/// A sale about to be persisted. Identity-free: the store assigns both the
/// sale id and the item ids.
#[derive(Debug, Clone)]
pub struct NewSale {
    pub customer_id: i64,
    pub sale_date: DateTime<Utc>,
    pub payment_mode: PaymentMode,
    pub sale_type: SaleType,
    pub gross_total: Decimal,
    pub items: Vec<NewSaleItem>,
}

/// One line of a [`NewSale`].
#[derive(Debug, Clone)]
pub struct NewSaleItem {
    pub product_id: i64,
    pub quantity: Decimal,
    pub price: Decimal,
    pub total_price: Decimal,
}

// =============================================================================
// Unit Tests
// =============================================================================
