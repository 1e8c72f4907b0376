// ============================
// crates/backend-lib/src/auth/random.rs
// ============================
//! Source of cryptographically secure random bytes.
//!
//! Salts and security stamps both draw from a [`SecureRandom`] handed to the
//! component that needs it, so tests can substitute their own source.
use rand::{rngs::OsRng, RngCore};

/// A cryptographically secure byte source
pub trait SecureRandom: Send + Sync {
    /// Fill `dest` entirely with random bytes
    fn fill_bytes(&self, dest: &mut [u8]);
}

/// Operating-system entropy; the production source
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl SecureRandom for OsRandom {
    fn fill_bytes(&self, dest: &mut [u8]) {
        OsRng.fill_bytes(dest);
    }
}
