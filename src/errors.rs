//! Unified error type for the loan scenario service.
//!
//! Every fallible operation in the crate returns [`Result`]. The HTTP layer maps
//! each variant onto a status code: validation failures become 422, unknown
//! scenarios 404, and everything else is an internal fault.

use crate::core::validation::ValidationError;
use thiserror::Error;

/// Errors surfaced by the engine, the repository, the service and startup code.
#[derive(Debug, Error)]
pub enum Error {
    /// One or more request fields violated their constraints.
    #[error("Validation failed: {0}")]
    Validation(ValidationError),

    /// No scenario exists with the requested identifier.
    #[error("Loan scenario {id} not found")]
    NotFound {
        /// The identifier that was looked up
        id: i64,
    },

    /// Inputs that upstream validation should have rejected reached the math.
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput {
        /// Offending field
        field: String,
        /// What was wrong with it
        reason: String,
    },

    /// Stored data could not be mapped back into a scenario.
    #[error("Corrupt record: {message}")]
    CorruptRecord {
        /// Description of the inconsistency
        message: String,
    },

    /// Underlying `SeaORM` failure.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Configuration could not be loaded or is out of range.
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
    },

    /// The configured bind address is not a socket address.
    #[error("Invalid bind address: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    /// Socket or file failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ValidationError> for Error {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl Error {
    /// Builds an [`Error::InvalidInput`] for `field`.
    pub(crate) fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
