//! Command-line Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction. Errors from the library crates are raised into these
//! kinds, so `main` only ever deals with one type.

use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("could not load configuration")]
    Config,
    #[display("package index request failed")]
    Index,
    /// The index could not be reached, or failed on its side.
    #[display("package index is unavailable")]
    Unavailable,
    #[display("No versions of \"{_0}\" were found. Please try your search again. NOTE: Case matters.")]
    NotFound(#[error(not(source))] String),
    #[display("package \"{_0}\" has no releases")]
    NoReleases(#[error(not(source))] String),
    #[display("package \"{_0}\" has no home page")]
    NoHomePage(#[error(not(source))] String),
    #[display("could not open a web browser")]
    Browser,
    #[display("could not write output")]
    Output,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }
}
