//! Error types for the access model.

use thiserror::Error;

/// The main error type for access model operations.
///
/// Unknown roles and removal of a role the principal does not hold are not
/// errors: the first expands to nothing, the second is reported as
/// [`RemovalOutcome::NotFound`](crate::core::RemovalOutcome::NotFound).
#[derive(Error, Debug)]
pub enum Error {
    /// A role reference resolved to an unusable slug.
    #[error("Invalid role reference: {0}")]
    InvalidRoleReference(String),

    /// Principal with the given ID was not found in storage.
    #[error("Principal '{0}' not found")]
    PrincipalNotFound(String),

    /// A submitted form field could not be decoded.
    #[error("Invalid form field: {0}")]
    InvalidFormField(String),

    /// Serialization error.
    #[cfg(feature = "persistence")]
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Storage operation failed.
    #[error("Storage operation failed: {0}")]
    Storage(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl Error {
    /// Returns true if the error came from the persistence collaborator.
    ///
    /// Callers should treat the mutation as not durable and may retry.
    pub fn is_persistence_failure(&self) -> bool {
        match self {
            Error::Storage(_) => true,
            #[cfg(feature = "persistence")]
            Error::Serialization(_) => true,
            _ => false,
        }
    }
}

/// Result type alias for access model operations.
pub type Result<T> = std::result::Result<T, Error>;
