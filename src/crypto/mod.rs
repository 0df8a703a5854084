//! Fingerprint hashing for the voting machine
//!
//! Raw fingerprint identifiers are reduced to a fixed-length digest as
//! soon as they enter the machine. Only the digest is stored, and two
//! identifiers match exactly when their digests do.

use crate::config::{HashAlgorithm, HashingConfig};
use crate::types::FingerprintKey;
use crate::Result;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Deterministic one-way mapping from raw identifier to stored key
pub trait IdentityHasher: Send + Sync {
    /// Digest a raw fingerprint identifier
    fn fingerprint(&self, raw: &str) -> FingerprintKey;
}

/// Built-in fingerprint digests
///
/// Every variant renders 64 lowercase hex characters.
#[derive(Clone, Default)]
pub enum FingerprintHasher {
    /// Plain BLAKE3
    #[default]
    Blake3,
    /// BLAKE3 keyed with a deployment salt
    KeyedBlake3(Zeroizing<[u8; 32]>),
    /// SHA-256
    Sha256,
}

impl FingerprintHasher {
    /// Build the hasher selected by configuration
    pub fn from_config(config: &HashingConfig) -> Result<Self> {
        let hasher = match (config.algorithm, config.salt_key()?) {
            (HashAlgorithm::Blake3, Some(key)) => Self::KeyedBlake3(Zeroizing::new(key)),
            (HashAlgorithm::Blake3, None) => Self::Blake3,
            (HashAlgorithm::Sha256, None) => Self::Sha256,
            (HashAlgorithm::Sha256, Some(_)) => {
                return Err(crate::Error::config(
                    "A fingerprint salt is only supported with blake3",
                ));
            }
        };
        Ok(hasher)
    }

    /// Short algorithm label for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Blake3 => "blake3",
            Self::KeyedBlake3(_) => "blake3-keyed",
            Self::Sha256 => "sha256",
        }
    }
}

impl std::fmt::Debug for FingerprintHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // never print the key
        f.debug_tuple("FingerprintHasher").field(&self.name()).finish()
    }
}

impl IdentityHasher for FingerprintHasher {
    fn fingerprint(&self, raw: &str) -> FingerprintKey {
        let digest: [u8; 32] = match self {
            Self::Blake3 => blake3::hash(raw.as_bytes()).into(),
            Self::KeyedBlake3(key) => blake3::keyed_hash(key, raw.as_bytes()).into(),
            Self::Sha256 => Sha256::digest(raw.as_bytes()).into(),
        };
        FingerprintKey::from_digest(hex::encode(digest))
    }
}
