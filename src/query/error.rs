//! Query error types
//!
//! Defines all error conditions that can abort a query invocation.

use thiserror::Error;

use crate::time::TimeExpressionError;

/// Errors that can occur while running a query against the store
#[derive(Error, Debug)]
pub enum QueryError {
    /// `-from` or `-to` could not be resolved
    #[error(transparent)]
    TimeExpression(#[from] TimeExpressionError),

    /// The request target could not be assembled
    #[error("Invalid request: {0}")]
    RequestConstruction(String),

    /// Connecting to or talking with the store failed
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The store answered with a non-success status
    #[error("Store returned {status}: {message}")]
    Status { status: u16, message: String },

    /// A metadata header was missing or had the wrong shape
    #[error("Malformed result envelope: {header}: {reason}")]
    MalformedResultEnvelope {
        header: &'static str,
        reason: String,
    },

    /// Streaming the record body to output failed
    #[error("Failed to copy records: {0}")]
    Copy(#[source] std::io::Error),

    /// Writing the statistics report failed
    #[error("Failed to write diagnostics: {0}")]
    Diagnostics(#[source] std::io::Error),
}

/// Result type for query operations
pub type Result<T, E = QueryError> = std::result::Result<T, E>;
