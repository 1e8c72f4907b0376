// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
//!
//! Hashes are PBKDF2 payloads with a self-describing header, stored as
//! standard base64:
//!
//! ```text
//! [0]      format marker (0x01)
//! [1..5]   PRF identifier, u32 big-endian
//! [5..9]   iteration count, u32 big-endian
//! [9..13]  salt length, u32 big-endian
//! [13..]   salt, then the derived subkey
//! ```
//!
//! A new format gets a new marker. Unknown markers, short salts, short
//! subkeys and truncated payloads all verify as `false`.
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use pbkdf2::pbkdf2_hmac;
use sha2::{Sha256, Sha512};
use zeroize::Zeroize;

use super::random::{OsRandom, SecureRandom};
use crate::error::HashError;

/// Marker byte for the PBKDF2 payload written by [`CredentialHasher::hash`]
pub const FORMAT_MARKER_V1: u8 = 0x01;

/// PBKDF2 iteration count for new hashes
pub const ITERATION_COUNT: u32 = 1000;

/// Salt size in bytes (128 bits)
pub const SALT_SIZE: usize = 16;

/// Derived subkey size in bytes (256 bits)
pub const SUBKEY_SIZE: usize = 32;

const HEADER_LEN: usize = 13;
const MIN_SALT_LEN: usize = 128 / 8;
const MIN_SUBKEY_LEN: usize = 128 / 8;

/// Pseudorandom function recorded in the payload header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prf {
    HmacSha1,
    HmacSha256,
    HmacSha512,
}

impl Prf {
    /// Identifier written to the header
    pub fn id(self) -> u32 {
        match self {
            Prf::HmacSha1 => 0,
            Prf::HmacSha256 => 1,
            Prf::HmacSha512 => 2,
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(Prf::HmacSha1),
            1 => Some(Prf::HmacSha256),
            2 => Some(Prf::HmacSha512),
            _ => None,
        }
    }

    /// Fill `out` with the PBKDF2 output. Returns false if this PRF cannot
    /// be derived here.
    fn derive(self, password: &[u8], salt: &[u8], iterations: u32, out: &mut [u8]) -> bool {
        match self {
            Prf::HmacSha256 => {
                pbkdf2_hmac::<Sha256>(password, salt, iterations, out);
                true
            },
            Prf::HmacSha512 => {
                pbkdf2_hmac::<Sha512>(password, salt, iterations, out);
                true
            },
            // Recognised id, but SHA-1 is not accepted for credentials.
            Prf::HmacSha1 => false,
        }
    }
}

/// Derives and verifies credential hashes
#[derive(Clone)]
pub struct CredentialHasher {
    rng: Arc<dyn SecureRandom>,
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self::new(Arc::new(OsRandom))
    }
}

impl CredentialHasher {
    /// Create a hasher drawing salts from `rng`
    pub fn new(rng: Arc<dyn SecureRandom>) -> Self {
        Self { rng }
    }

    /// Hash `plain` into a base64 payload
    pub fn hash(&self, plain: &str) -> String {
        let prf = Prf::HmacSha256;

        let mut salt = [0u8; SALT_SIZE];
        self.rng.fill_bytes(&mut salt);

        let mut subkey = [0u8; SUBKEY_SIZE];
        prf.derive(plain.as_bytes(), &salt, ITERATION_COUNT, &mut subkey);

        let mut payload = Vec::with_capacity(HEADER_LEN + SALT_SIZE + SUBKEY_SIZE);
        payload.push(FORMAT_MARKER_V1);
        payload.extend_from_slice(&prf.id().to_be_bytes());
        payload.extend_from_slice(&ITERATION_COUNT.to_be_bytes());
        payload.extend_from_slice(&(SALT_SIZE as u32).to_be_bytes());
        payload.extend_from_slice(&salt);
        payload.extend_from_slice(&subkey);

        let encoded = STANDARD.encode(&payload);
        subkey.zeroize();
        payload.zeroize();
        encoded
    }

    /// Verify `candidate` against an encoded hash
    pub fn verify(&self, encoded: &str, candidate: &str) -> bool {
        let mut payload = match STANDARD.decode(encoded) {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };

        let verified = match payload.first() {
            Some(&FORMAT_MARKER_V1) => verify_v1(&payload, candidate.as_bytes()),
            _ => false,
        };

        payload.zeroize();
        verified
    }

    /// Like [`verify`](Self::verify), for callers holding optional values.
    ///
    /// A missing argument is a caller bug and is reported as an error rather
    /// than a failed verification.
    pub fn try_verify(
        &self,
        encoded: Option<&str>,
        candidate: Option<&str>,
    ) -> Result<bool, HashError> {
        let encoded = encoded.ok_or(HashError::MissingArgument("encoded"))?;
        let candidate = candidate.ok_or(HashError::MissingArgument("candidate"))?;
        Ok(self.verify(encoded, candidate))
    }
}

fn verify_v1(payload: &[u8], candidate: &[u8]) -> bool {
    let (Some(prf_id), Some(iterations), Some(salt_len)) = (
        read_u32_be(payload, 1),
        read_u32_be(payload, 5),
        read_u32_be(payload, 9),
    ) else {
        return false;
    };

    let Some(prf) = Prf::from_id(prf_id) else {
        return false;
    };
    if iterations == 0 {
        return false;
    }

    let salt_len = salt_len as usize;
    if salt_len < MIN_SALT_LEN {
        return false;
    }
    let Some(salt_end) = HEADER_LEN.checked_add(salt_len) else {
        return false;
    };
    let (Some(salt), Some(expected)) = (payload.get(HEADER_LEN..salt_end), payload.get(salt_end..))
    else {
        return false;
    };
    if expected.len() < MIN_SUBKEY_LEN {
        return false;
    }

    let mut actual = vec![0u8; expected.len()];
    let derived = prf.derive(candidate, salt, iterations, &mut actual);
    let matches = derived && fixed_time_eq(&actual, expected);
    actual.zeroize();
    matches
}

fn read_u32_be(buf: &[u8], offset: usize) -> Option<u32> {
    let bytes = buf.get(offset..offset + 4)?;
    Some(u32::from_be_bytes(bytes.try_into().ok()?))
}

/// Compare two buffers without stopping at the first difference.
///
/// Lengths are public, so a length mismatch returns early.
#[inline(never)]
pub(crate) fn fixed_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut same = true;
    for (x, y) in a.iter().zip(b.iter()) {
        same &= std::hint::black_box(x == y);
    }
    same
}
