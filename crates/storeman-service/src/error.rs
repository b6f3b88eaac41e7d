//! # Service Error Types
//!
//! What callers of [`crate::SaleService`] see. Wraps the domain and database
//! errors and adds the invalid-argument kinds raised by the strict enum
//! lookup paths.
//!
//! The fallback identifier chain never produces `UnknownPaymentMode` /
//! `UnknownSaleType`: there, failed matches are control flow, not errors.

use thiserror::Error;

use storeman_core::CoreError;
use storeman_db::DbError;

/// Errors raised by the sale recording & lookup service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Business rule violation (missing customer/product, insufficient stock).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Persistence failure.
    #[error(transparent)]
    Db(#[from] DbError),

    /// The strict payment-mode lookup was given a name that matches no
    /// enumerator.
    #[error("Unknown payment mode: {0}")]
    UnknownPaymentMode(String),

    /// The strict sale-type lookup was given a name that matches no
    /// enumerator.
    #[error("Unknown sale type: {0}")]
    UnknownSaleType(String),
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
