//! Defines the crate-level error type shared by the stores and adapters.

use thiserror::Error;

/// The errors that may occur while operating on the ledger.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// A negative or non-finite amount was used to create or update a record.
    ///
    /// Amounts record magnitudes of money spent, earned or budgeted, so they
    /// must be zero or greater and finite. Rejected before any store
    /// mutation.
    #[error("{0} is not a valid amount: amounts must be non-negative and finite")]
    InvalidAmount(f64),

    /// A string that is not a recognized ISO 4217 code was used as a
    /// currency.
    #[error("\"{0}\" is not a recognized currency code")]
    UnknownCurrency(String),

    /// The requested record could not be found.
    ///
    /// Returned by get, update and delete when the given ID or username does
    /// not refer to a stored record. The store is left unchanged.
    #[error("the requested record could not be found")]
    NotFound,

    /// The username is already registered.
    ///
    /// Surfaced to the caller as-is, the caller should pick a different
    /// username rather than retry.
    #[error("the username \"{0}\" is already registered")]
    DuplicateUsername(String),

    /// A transaction referenced an owner that is not a registered user.
    #[error("the owner \"{0}\" does not refer to a registered user")]
    UnknownOwner(String),

    /// A persisted row could not be parsed.
    ///
    /// Whether this error is surfaced or the offending row is skipped is
    /// controlled by [RowPolicy](crate::csv::RowPolicy).
    #[error("could not parse row: {0}")]
    InvalidCsv(String),

    /// An unexpected error occurred with the underlying hashing library.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An I/O error occurred while reading or writing a persisted file.
    #[error("an I/O error occurred: {0}")]
    Io(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(value.to_string())
    }
}
