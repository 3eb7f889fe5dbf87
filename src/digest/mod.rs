// src/digest/mod.rs

//! Content fingerprinting.
//!
//! The engine only depends on [`DigestFunction`]; which algorithm backs it is
//! a configuration choice made when the engine is built.

use sha2::{Digest, Sha256, Sha512};

use crate::errors::HashError;
use crate::types::HashAlgorithm;

/// Maps raw resource bytes to a lowercase hex digest.
///
/// Implementations must be pure: identical input always yields the same
/// digest.
pub trait DigestFunction: Send + Sync {
    fn algorithm(&self) -> HashAlgorithm;

    fn hash(&self, bytes: &[u8]) -> Result<String, HashError>;
}

/// Digest strategy backed by the algorithm named in the config.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hasher {
    algorithm: HashAlgorithm,
}

impl Hasher {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }
}

impl DigestFunction for Hasher {
    fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    fn hash(&self, bytes: &[u8]) -> Result<String, HashError> {
        let digest = match self.algorithm {
            HashAlgorithm::Sha256 => hex::encode(Sha256::digest(bytes)),
            HashAlgorithm::Sha512 => hex::encode(Sha512::digest(bytes)),
            HashAlgorithm::Blake3 => blake3::hash(bytes).to_hex().to_string(),
        };
        Ok(digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vectors() {
        let sha256 = Hasher::new(HashAlgorithm::Sha256);
        assert_eq!(
            sha256.hash(b"abc").unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );

        let sha512 = Hasher::new(HashAlgorithm::Sha512);
        assert_eq!(
            sha512.hash(b"").unwrap(),
            "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce\
             47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e"
        );

        // blake3 hash of "hello world"
        let blake3 = Hasher::new(HashAlgorithm::Blake3);
        assert_eq!(
            blake3.hash(b"hello world").unwrap(),
            "d74981efa70a0c880b8d8c1985d075dbcbf679b99a5f9914e5aaf96b831a9e24"
        );
    }

    #[test]
    fn default_algorithm_is_sha512() {
        let hasher = Hasher::default();
        assert_eq!(hasher.algorithm(), HashAlgorithm::Sha512);
        assert_eq!(hasher.hash(b"page").unwrap().len(), 128);
    }

    #[test]
    fn one_bit_flip_changes_digest() {
        let hasher = Hasher::new(HashAlgorithm::Sha256);
        let a = hasher.hash(b"<html>a</html>").unwrap();
        let b = hasher.hash(b"<html>c</html>").unwrap();
        assert_ne!(a, b);
        assert_eq!(a, hasher.hash(b"<html>a</html>").unwrap());
    }
}
