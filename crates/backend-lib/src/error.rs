// crates/backend-lib/src/error.rs

//! Error types for the identity core.
//!
//! Expected business failures (bad input, unknown user, wrong password) are
//! never errors: they travel in [`identity_common::Outcome`]. The enums here
//! cover contract violations and infrastructure faults.
use thiserror::Error;
use uuid::Uuid;

/// Contract violations raised by the credential hasher
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HashError {
    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),
}

/// Failures reported by a repository backend
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Entity not found: {0}")]
    NotFound(Uuid),

    #[error("Entity already exists: {0}")]
    AlreadyExists(Uuid),

    #[error("Commit failed: {0}")]
    Commit(String),
}

/// Errors surfaced by the lifecycle manager
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl IdentityError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            IdentityError::Cancelled => "ID_001",
            IdentityError::NotImplemented(_) => "ID_002",
            IdentityError::Repository(_) => "REPO_001",
            IdentityError::Config(_) => "CFG_001",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            IdentityError::Cancelled => "The operation was cancelled".to_string(),
            IdentityError::NotImplemented(_) => "Operation not supported".to_string(),
            IdentityError::Repository(_) => "A storage error occurred".to_string(),
            IdentityError::Config(_) => "An internal error occurred".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IdentityError>;
