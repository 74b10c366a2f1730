//! Error types for balance calculations.

use crate::money::MonetaryField;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, BalanceError>;

/// Errors that can occur while interpreting billing data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BalanceError {
    /// A monetary field was missing or did not hold a finite number.
    #[error("monetary field unavailable: {field}")]
    FieldUnavailable {
        /// The field that could not be read.
        field: MonetaryField,
    },

    /// The billing cycle does not name a real calendar month.
    #[error("invalid billing cycle: year={year}, month={month}")]
    InvalidBillingCycle {
        /// Cycle year.
        year: i32,
        /// Cycle month, expected in `1..=12`.
        month: u32,
    },

    /// No usable API key / team id pair is configured.
    #[error("no credentials configured")]
    NoCredentials,
}
