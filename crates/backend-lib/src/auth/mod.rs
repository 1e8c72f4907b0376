// ============================
// identity-core/src/auth/mod.rs
// ============================
//! Credential hashing and secure random tokens.

pub mod password;
pub mod random;
pub mod token_generator;

pub(crate) use password::fixed_time_eq;
pub use password::{CredentialHasher, Prf, FORMAT_MARKER_V1, ITERATION_COUNT, SALT_SIZE, SUBKEY_SIZE};
pub use random::{OsRandom, SecureRandom};
pub use token_generator::{generate_security_token, DEFAULT_TOKEN_BYTES};
