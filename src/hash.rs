//! Digest capability used by the processors and the identity lookup.

use sha2::{Digest, Sha256};

/// Hasher turns a value into a printable digest.
pub trait Hasher: Send + Sync {
    fn hash_hex(&self, value: &[u8]) -> String;
}

/// SHA-256, rendered as lowercase hex.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Hasher;

impl Hasher for Sha256Hasher {
    fn hash_hex(&self, value: &[u8]) -> String {
        sha256_hex(value)
    }
}

/// SHA-256 digest of `value` as a lowercase hex string.
pub fn sha256_hex(value: impl AsRef<[u8]>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_ref());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digests() {
        assert_eq!(
            sha256_hex(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn hasher_matches_free_function() {
        let digest = Sha256Hasher.hash_hex(b"bob@test.com");
        assert_eq!(digest, sha256_hex("bob@test.com"));
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
