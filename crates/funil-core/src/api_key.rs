//! API key secrets: generation, hashing and display prefix.
//!
//! The full secret only exists in memory between generation and the issuance
//! response. Storage keeps the SHA-256 hash (lookup) and the first
//! [`DISPLAY_PREFIX_LEN`] characters (identification in listings).

use rand::Rng;
use sha2::{Digest, Sha256};

/// Fixed tag that makes Funil keys recognizable in logs and secret scanners.
pub const API_KEY_TAG: &str = "fbn_";

/// Number of random bytes behind each secret (256 bits).
pub const SECRET_BYTES: usize = 32;

/// Number of leading characters kept as the human-readable prefix.
pub const DISPLAY_PREFIX_LEN: usize = 12;

/// Output of a key issuance before it is persisted.
#[derive(Debug, Clone)]
pub struct IssuedKey {
    /// Shown to the caller once, never stored.
    pub secret: String,
    pub hash: String,
    pub prefix: String,
}

impl IssuedKey {
    pub fn generate() -> Self {
        let secret = generate_secret();
        let hash = hash_secret(&secret);
        let prefix = display_prefix(&secret);
        Self {
            secret,
            hash,
            prefix,
        }
    }
}

/// Generate a new secret: `fbn_` followed by 64 hex chars.
pub fn generate_secret() -> String {
    let mut rng = rand::rng();
    let random_bytes: [u8; SECRET_BYTES] = rng.random();
    format!("{}{}", API_KEY_TAG, hex::encode(random_bytes))
}

/// Deterministic lookup hash of a presented secret (lowercase hex SHA-256).
pub fn hash_secret(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

/// First 12 characters of the secret.
pub fn display_prefix(secret: &str) -> String {
    secret.chars().take(DISPLAY_PREFIX_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_secret_format() {
        let secret = generate_secret();
        assert!(secret.starts_with(API_KEY_TAG));
        assert_eq!(secret.len(), API_KEY_TAG.len() + SECRET_BYTES * 2);
        assert!(secret[API_KEY_TAG.len()..]
            .chars()
            .all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_secret_is_random() {
        assert_ne!(generate_secret(), generate_secret());
    }

    #[test]
    fn test_hash_secret_is_sha256_hex() {
        // sha256("abc")
        assert_eq!(
            hash_secret("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(hash_secret("fbn_x"), hash_secret("fbn_x"));
        assert_ne!(hash_secret("fbn_x"), hash_secret("fbn_y"));
    }

    #[test]
    fn test_display_prefix() {
        assert_eq!(display_prefix("fbn_0123456789abcdef"), "fbn_01234567");
        assert_eq!(display_prefix("short"), "short");
    }

    #[test]
    fn test_issued_key_is_consistent() {
        let issued = IssuedKey::generate();
        assert_eq!(issued.hash, hash_secret(&issued.secret));
        assert_eq!(issued.prefix, display_prefix(&issued.secret));
        assert_eq!(issued.prefix.len(), DISPLAY_PREFIX_LEN);
    }
}
