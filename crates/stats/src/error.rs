//! Statistics Error Types
//!
//! Structured errors using `exn` for location tracking and error trees.
//! Aggregation itself never fails; only parsing and formatting of upload
//! timestamps can.

use derive_more::{Display, Error};

/// A statistics error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for statistics operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// An upload timestamp from the index could not be parsed.
    #[display("invalid upload timestamp: {_0}")]
    InvalidTimestamp(#[error(not(source))] String),
    /// A date format description could not be parsed.
    #[display("invalid date format: {_0}")]
    InvalidDateFormat(#[error(not(source))] String),
    /// A date could not be rendered with the configured format.
    #[display("failed to format date")]
    Format,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
