//! Time Window Resolution
//!
//! Turns the user's `-from`/`-to` strings into absolute timestamps:
//!
//! - **duration**: Signed duration grammar (`-1h30m`, `1.5h`, `300ms`)
//! - **expression**: Classification into now/relative/absolute and resolution
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust
//! use chrono::DateTime;
//! use sluice::time::{resolve, TimeField};
//!
//! let now = DateTime::parse_from_rfc3339("2024-03-10T12:00:00Z").unwrap();
//! let from = resolve(TimeField::From, "-1h", now).unwrap();
//! assert_eq!(from.as_str(), "2024-03-10T11:00:00Z");
//! ```

mod duration;
mod error;
mod expression;

pub use duration::parse_duration;
pub use error::{TimeExpressionError, TimeResult};
pub use expression::{format_timestamp, resolve, ResolvedTime, TimeExpression, TimeField};
