// ============================
// crates/backend-lib/src/auth/token_generator.rs
// ============================
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
/** Secure token generation for security stamps
Stamps travel inside confirmation links, so they are encoded with the
URL-safe alphabet and no padding. */
use super::random::SecureRandom;

/// Default token size in bytes (32 bytes = 256 bits of entropy)
pub const DEFAULT_TOKEN_BYTES: usize = 32;

/** Generate a security stamp from `rng`
# Returns
A base64 URL-safe encoded string without padding */
pub fn generate_security_token(rng: &dyn SecureRandom) -> String {
    generate_security_token_with_size(rng, DEFAULT_TOKEN_BYTES)
}

/** Generate a token of a specific size
# Arguments
* `rng` - Entropy source
* `bytes` - The size of the random token in bytes */
fn generate_security_token_with_size(rng: &dyn SecureRandom, bytes: usize) -> String {
    let mut buffer = vec![0u8; bytes];
    rng.fill_bytes(&mut buffer);
    URL_SAFE_NO_PAD.encode(buffer)
}
