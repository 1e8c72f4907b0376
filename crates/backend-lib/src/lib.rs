// ============================
// identity-core/src/lib.rs
// ============================
//! Core of the identity provider: credential hashing, registration
//! validation and the account lifecycle.

pub mod auth;
pub mod claims;
pub mod config;
pub mod error;
pub mod manager;
pub mod metrics;
pub mod storage;
pub mod telemetry;
pub mod validation;

pub use auth::{CredentialHasher, OsRandom, SecureRandom};
pub use claims::ClaimStore;
pub use config::{LogFormat, Settings};
pub use error::{HashError, IdentityError, RepositoryError, Result};
pub use manager::IdentityLifecycleManager;
pub use storage::{
    ByEmail, Entity, FlatFileRepository, InMemoryRepository, Repository, Specification, WriteBatch,
};
pub use validation::{PasswordPolicy, RegistrationValidator};

pub use identity_common::{Claim, Outcome, OutcomeKind, RegistrationRequest, User};
pub use tokio_util::sync::CancellationToken;
