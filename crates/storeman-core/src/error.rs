//! # Error Types
//!
//! Domain-specific error types for storeman-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storeman-core errors (this file)                                      │
//! │  └── CoreError      - Business rule violations                         │
//! │                                                                         │
//! │  storeman-db errors (separate crate)                                   │
//! │  └── DbError        - Database operation failures                      │
//! │                                                                         │
//! │  storeman-service errors (separate crate)                              │
//! │  └── ServiceError   - What callers of the service see                  │
//! │                                                                         │
//! │  Flow: CoreError / DbError → ServiceError → caller                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, id, etc.)
//! 3. Errors are enum variants, never String

use rust_decimal::Decimal;
use thiserror::Error;

/// Core business logic errors.
///
/// These represent business rule violations raised while recording a sale.
/// They propagate to the caller unchanged; no local recovery is attempted.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The customer referenced by a sale request does not exist.
    #[error("Customer not found: {0}")]
    CustomerNotFound(i64),

    /// A product referenced by a sale line does not exist, either during
    /// sale construction or during stock deduction.
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Deducting a line's quantity would push the product's stock below
    /// zero. Names the offending product.
    ///
    /// Raised after the sale row is already committed; the sale and any
    /// lines deducted before this one stay in place.
    #[error("Insufficient stock for product: {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: Decimal,
        requested: Decimal,
    },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product: "Basmati Rice 5kg".to_string(),
            available: Decimal::new(3, 0),
            requested: Decimal::new(5, 0),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product: Basmati Rice 5kg: available 3, requested 5"
        );

        let err = CoreError::CustomerNotFound(17);
        assert_eq!(err.to_string(), "Customer not found: 17");
    }
}
