//! Hashing helpers

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256, used for fixed-length cache key suffixes
pub fn sha256_hex(data: impl AsRef<[u8]>) -> String {
    hex::encode(Sha256::digest(data.as_ref()))
}
