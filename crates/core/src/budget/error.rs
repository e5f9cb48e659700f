//! Budget error types.

use thiserror::Error;

/// Budget-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetError {
    /// Manual line has no name.
    #[error("Budget line name is required")]
    NameRequired,

    /// Quantity cannot be negative.
    #[error("Quantity cannot be negative")]
    NegativeQuantity,

    /// Unit price cannot be negative.
    #[error("Unit price cannot be negative")]
    NegativePrice,

    /// Money or quantity outside the accepted range.
    #[error("{0} must be between -1000000000 and 1000000000")]
    AmountOutOfRange(&'static str),

    /// FNB entry type is neither purchase nor consumption.
    #[error("entry_type must be 'purchase' or 'consumption'")]
    InvalidEntryType(String),
}
