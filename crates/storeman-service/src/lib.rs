//! # storeman-service: Sale Recording & Lookup Service
//!
//! The orchestration layer of the Storeman backend.
//!
//! ## Control Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Sale Recording Flow                                │
//! │                                                                         │
//! │  SaleRequest (DTO)                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Resolve customer ──► Resolve products ──► Build NewSale aggregate     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleStore::save (sale + items, one transaction)                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Per item: reload product ──► subtract quantity ──► save product       │
//! │       │          (fails with InsufficientStock below zero)             │
//! │       ▼                                                                 │
//! │  SaleDto (response representation)                                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`dto`] - Request/response representations (camelCase JSON)
//! - [`sale_service`] - The [`SaleService`] itself
//! - [`error`] - Service-level error type

pub mod dto;
pub mod error;
pub mod sale_service;

pub use dto::{CustomerDto, ProductSummaryDto, SaleDto, SaleItemDto, SaleItemRequest, SaleRequest};
pub use error::{ServiceError, ServiceResult};
pub use sale_service::SaleService;
