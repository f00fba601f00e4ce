//! Index Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};

/// An index error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for index operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The index has no package (or version) by that name. Names are case-sensitive.
    #[display("package not found: {_0}")]
    NotFound(#[error(not(source))] String),
    /// The input is neither a valid package name nor a package URL.
    #[display("invalid name or URL: {_0}")]
    InvalidName(#[error(not(source))] String),
    /// The request never completed (DNS, TLS, timeout, ...).
    #[display("network error")]
    Network,
    /// The index answered with an unexpected HTTP status.
    #[display("unexpected HTTP status: {_0}")]
    Status(#[error(not(source))] u16),
    /// The JSON document did not match the expected schema.
    #[display("invalid package data")]
    InvalidData,
    /// The XML-RPC response was malformed.
    #[display("malformed XML-RPC response: {_0}")]
    Protocol(#[error(not(source))] String),
    /// The XML-RPC endpoint answered with a fault.
    #[display("XML-RPC fault: {_0}")]
    Rpc(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network => true,
            Self::Status(status) => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorKind::NotFound("nope".to_string()), "package not found: nope")]
    #[case(ErrorKind::InvalidName("a b".to_string()), "invalid name or URL: a b")]
    #[case(ErrorKind::Status(503), "unexpected HTTP status: 503")]
    #[case(ErrorKind::Rpc("boom".to_string()), "XML-RPC fault: boom")]
    fn error_kind_display(#[case] kind: ErrorKind, #[case] expected: &str) {
        assert_eq!(kind.to_string(), expected);
    }

    #[rstest]
    #[case(ErrorKind::Network, true)]
    #[case(ErrorKind::Status(502), true)]
    #[case(ErrorKind::Status(429), false)]
    #[case(ErrorKind::NotFound("nope".to_string()), false)]
    #[case(ErrorKind::InvalidData, false)]
    fn error_kind_retryable(#[case] kind: ErrorKind, #[case] expected: bool) {
        assert_eq!(kind.is_retryable(), expected);
    }
}
