//! Time expression error types

use thiserror::Error;

use super::expression::TimeField;

/// Errors that can occur while resolving a `-from`/`-to` expression
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeExpressionError {
    /// Input parsed as both a duration and a timestamp, or as neither
    #[error("couldn't parse -{field} ({input:?}) as either duration or time")]
    Ambiguous { field: TimeField, input: String },

    /// Applying the offset to now left the representable range
    #[error("-{field} ({input:?}) is out of the representable time range")]
    OutOfRange { field: TimeField, input: String },
}

/// Result type for time expression operations
pub type TimeResult<T> = Result<T, TimeExpressionError>;
