// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Registration and password validation.
//!
//! Validators collect every failure instead of stopping at the first, so a
//! single response can tell the user everything that needs fixing.

pub mod password;
pub mod registration;

pub use password::PasswordPolicy;
pub use registration::RegistrationValidator;
