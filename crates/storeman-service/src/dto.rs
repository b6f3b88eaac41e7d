//! # Data Transfer Objects
//!
//! Request and response representations at the service boundary. JSON field
//! names are camelCase (`saleId`, `paymentMode`, ...) to match the store
//! management frontend.
//!
//! ## Translation
//! ```text
//! SaleRequest ──► NewSale (draft)  ──► SaleStore::save ──► Sale ──► SaleDto
//! ```
//! Requests may carry a `saleId`; it is ignored — identity is assigned by
//! the store on creation, never by callers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storeman_core::{PaymentMode, Sale, SaleItem, SaleType};

// =============================================================================
// Requests
// =============================================================================

/// A sale to be recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
    /// Ignored when present; the store assigns sale identity.
    #[serde(default)]
    pub sale_id: Option<i64>,

    pub customer: CustomerRefDto,

    /// Defaults to the current time when absent.
    #[serde(default)]
    pub sale_date: Option<DateTime<Utc>>,

    pub payment_mode: PaymentMode,

    pub sale_type: SaleType,

    pub gross_total: Decimal,

    /// Line items, in order.
    pub items: Vec<SaleItemRequest>,
}

/// Reference to an existing customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRefDto {
    pub customer_id: i64,
}

/// One requested sale line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemRequest {
    pub product: ProductRefDto,
    pub quantity: Decimal,
    pub price: Decimal,
    pub total_price: Decimal,
}

/// Reference to an existing product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRefDto {
    pub product_id: i64,
}

// =============================================================================
// Responses
// =============================================================================

/// Response representation of a recorded sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDto {
    pub sale_id: i64,
    /// Absent when the sale has no customer on record.
    pub customer: Option<CustomerDto>,
    pub sale_date: DateTime<Utc>,
    pub payment_mode: PaymentMode,
    pub sale_type: SaleType,
    pub gross_total: Decimal,
    pub items: Vec<SaleItemDto>,
}

/// Customer summary nested in a sale response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    pub customer_id: i64,
    pub customer_name: String,
    pub mobile_number: Option<String>,
    pub address: Option<String>,
}

/// One sale line in a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemDto {
    pub sale_item_id: i64,
    pub product: ProductSummaryDto,
    pub quantity: Decimal,
    pub price: Decimal,
    pub total_price: Decimal,
}

/// Product summary nested in a sale line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummaryDto {
    pub product_id: i64,
    pub product_code: String,
    pub product_name: String,
}

// =============================================================================
// Translation
// =============================================================================

impl From<Sale> for SaleDto {
    fn from(sale: Sale) -> Self {
        SaleDto {
            sale_id: sale.sale_id,
            customer: sale.customer.map(|c| CustomerDto {
                customer_id: c.customer_id,
                customer_name: c.customer_name,
                mobile_number: c.mobile_number,
                address: c.address,
            }),
            sale_date: sale.sale_date,
            payment_mode: sale.payment_mode,
            sale_type: sale.sale_type,
            gross_total: sale.gross_total,
            items: sale.items.into_iter().map(SaleItemDto::from).collect(),
        }
    }
}

impl From<SaleItem> for SaleItemDto {
    fn from(item: SaleItem) -> Self {
        SaleItemDto {
            sale_item_id: item.item_id,
            product: ProductSummaryDto {
                product_id: item.product.product_id,
                product_code: item.product.product_code,
                product_name: item.product.product_name,
            },
            quantity: item.quantity,
            price: item.price,
            total_price: item.total_price,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
