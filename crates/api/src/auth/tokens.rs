//! Opaque token generation and digests
//!
//! Verification and reset tokens are random hex strings carrying no
//! structure; they authorize sensitive actions directly from an emailed
//! link, so they carry 256 bits of entropy. Reset tokens are stored only
//! as SHA-256 digests and looked up by digest.

use rand::RngCore;
use sha2::{Digest, Sha256};
use time::Duration;

/// Entropy of an opaque token in bytes (hex-encodes to 64 chars)
pub const OPAQUE_TOKEN_BYTES: usize = 32;

/// Email verification window
pub const VERIFICATION_TOKEN_TTL: Duration = Duration::hours(24);

/// Password reset window
pub const RESET_TOKEN_TTL: Duration = Duration::minutes(30);

/// Generate a cryptographically random, URL-safe hex token
pub fn generate_opaque_token() -> String {
    let mut bytes = [0u8; OPAQUE_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Fast deterministic one-way digest for token lookup
///
/// The digest, never the raw token, is what gets persisted.
pub fn hash_token(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}
