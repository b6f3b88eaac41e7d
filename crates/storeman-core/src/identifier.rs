//! # Sale Identifier Interpretation
//!
//! Ordered interpretation of a single free-text token used to look up sales.
//!
//! ## Interpretation Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   How an Identifier Is Resolved                         │
//! │                                                                         │
//! │  "42"        ──► parses as integer        ──► Id(42)                   │
//! │  "cash"      ──► payment mode name        ──► PaymentMode(Cash)        │
//! │  "WHOLESALE" ──► sale type name           ──► SaleType(Wholesale)      │
//! │  "ali"       ──► nothing above matched    ──► CustomerName("ali")      │
//! │                                                                         │
//! │  Strategies run in order; the first match wins. The customer-name      │
//! │  interpretation is unconditional and always terminates the chain.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Failed parses are ordinary control flow (`None`), never errors. The chain
//! is an explicit ordered slice of strategy functions rather than nested
//! dispatch, so reordering or extending it is a one-line change.

use crate::types::{PaymentMode, SaleType};

/// The resolved meaning of a free-text sale identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum SaleIdentifier {
    /// A numeric sale id. Terminal even when no such sale exists.
    Id(i64),
    /// The name of a payment mode; selects all sales paid that way.
    PaymentMode(PaymentMode),
    /// The name of a sale type; selects all sales of that kind.
    SaleType(SaleType),
    /// Fallback: a case-insensitive substring of a customer name.
    CustomerName(String),
}

/// One interpretation attempt: matched or not, never an error.
type Strategy = fn(&str) -> Option<SaleIdentifier>;

/// Conditional strategies, evaluated in order. The customer-name fallback is
/// not listed here because it always matches.
const STRATEGIES: &[Strategy] = &[as_sale_id, as_payment_mode, as_sale_type];

fn as_sale_id(text: &str) -> Option<SaleIdentifier> {
    text.parse::<i64>().ok().map(SaleIdentifier::Id)
}

fn as_payment_mode(text: &str) -> Option<SaleIdentifier> {
    PaymentMode::from_name(text).map(SaleIdentifier::PaymentMode)
}

fn as_sale_type(text: &str) -> Option<SaleIdentifier> {
    SaleType::from_name(text).map(SaleIdentifier::SaleType)
}

impl SaleIdentifier {
    /// Interprets a free-text token, stopping at the first strategy that
    /// matches and falling through to the customer-name interpretation.
    pub fn interpret(text: &str) -> Self {
        STRATEGIES
            .iter()
            .find_map(|strategy| strategy(text))
            .unwrap_or_else(|| SaleIdentifier::CustomerName(text.to_owned()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_wins_first() {
        assert_eq!(SaleIdentifier::interpret("42"), SaleIdentifier::Id(42));
        // Leading zeros still parse
        assert_eq!(SaleIdentifier::interpret("007"), SaleIdentifier::Id(7));
    }

    #[test]
    fn test_payment_mode_before_sale_type() {
        assert_eq!(
            SaleIdentifier::interpret("CASH"),
            SaleIdentifier::PaymentMode(PaymentMode::Cash)
        );
        assert_eq!(
            SaleIdentifier::interpret("online"),
            SaleIdentifier::PaymentMode(PaymentMode::Online)
        );
    }

    #[test]
    fn test_sale_type_match() {
        assert_eq!(
            SaleIdentifier::interpret("wholesale"),
            SaleIdentifier::SaleType(SaleType::Wholesale)
        );
        assert_eq!(
            SaleIdentifier::interpret("Retail"),
            SaleIdentifier::SaleType(SaleType::Retail)
        );
    }

    #[test]
    fn test_fallback_to_customer_name() {
        assert_eq!(
            SaleIdentifier::interpret("ali"),
            SaleIdentifier::CustomerName("ali".to_owned())
        );
        // Partly numeric input is not an id
        assert_eq!(
            SaleIdentifier::interpret("12abc"),
            SaleIdentifier::CustomerName("12abc".to_owned())
        );
        // Empty input still resolves (to an empty substring match)
        assert_eq!(
            SaleIdentifier::interpret(""),
            SaleIdentifier::CustomerName(String::new())
        );
    }
}
