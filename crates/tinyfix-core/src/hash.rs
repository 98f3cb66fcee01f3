use crate::long_url::LongUrl;
use sha2::{Digest, Sha256};
use std::fmt::Display;

/// SHA-256 digest of a long URL's exact bytes.
///
/// Identical bytes always hash to the same value, which is what makes
/// shortening idempotent per URL.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hashes the exact bytes of `url`.
    pub fn of(url: &LongUrl) -> Self {
        Self::from_bytes(url.as_bytes())
    }

    /// Hashes arbitrary bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hasher.finalize().into())
    }

    /// Lowercase hex rendering, 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ContentHash").field(&self.to_hex()).finish()
    }
}

impl Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}
