//! One-time code generation and hashing.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Generate a uniformly random 6-digit numeric code, zero-padded.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    format!("{:06}", rng.random_range(0..1_000_000u32))
}

/// SHA-256 hash of a raw code, hex-encoded.
///
/// Only the hash is persisted as `otp_challenge.code_hash`; the raw
/// code exists in the delivery email alone. Verification is an exact
/// comparison of the hashes.
pub fn hash_code(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}
