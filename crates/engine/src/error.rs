//! The module contains the errors the engine can raise.
//!
//! Every failed precondition aborts the surrounding unit of work, so a
//! returned error always means no state was mutated.
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
///
/// The first four variants form the stable taxonomy the HTTP layer maps to
/// status codes; [`Database`] wraps storage failures unchanged.
///
/// [`Database`]: EngineError::Database
#[derive(Error, Debug)]
pub enum EngineError {
    /// A referenced user, wallet or transaction does not exist.
    #[error("{0}")]
    NotFound(String),
    /// The operation is blocked by existing state (frozen wallet, transaction
    /// already reversed, email already taken).
    #[error("{0}")]
    Conflict(String),
    /// A business rule was violated by otherwise-valid entities.
    #[error("{0}")]
    BadRequest(String),
    /// Malformed input that slipped past the boundary checks.
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::BadRequest(a), Self::BadRequest(b)) => a == b,
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
