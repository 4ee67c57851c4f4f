//! Core error types for the Passdown will builder.
//!
//! Every error here is local and synchronous: it is returned at the call site
//! of the operation that detected it and never retried. Hosts translate these
//! into user-facing messages.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for allocation, payload and will-draft operations.
#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("Index {index} is out of range for {len} entries")]
    InvalidIndex { index: usize, len: usize },

    #[error("Cannot remove the sole beneficiary")]
    SoleBeneficiaryRemoval,

    #[error("Cannot remove the sole trusted wallet")]
    SoleTrustedWalletRemoval,

    #[error("No contract address is configured for asset '{0}'")]
    UnresolvedAsset(String),

    #[error("Asset '{0}' is not part of the allocation catalogue")]
    UnknownAsset(String),

    #[error("Share {0} is outside the range 0..=100")]
    OutOfRangeShare(f64),

    #[error("Invalid asset catalogue: {0}")]
    InvalidCatalogue(String),

    #[error("Chain '{0}' is not supported")]
    UnsupportedChain(String),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Validation errors for user input.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),
}

impl Error {
    pub(crate) fn invalid_index(index: usize, len: usize) -> Self {
        Error::InvalidIndex { index, len }
    }
}

// === From implementations for common error types ===

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Config(err.to_string())
    }
}
