use bcrypt::{hash, verify, BcryptError};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Hashes and verifies user passwords.
///
/// The secret is first reduced to the hex SHA-256 digest of its UTF-8 bytes
/// (64 ASCII characters), then bcrypt-hashed with a fresh salt. The digest
/// keeps bcrypt's input under its 72 byte ceiling for any secret.
#[derive(Debug, Clone, Copy)]
pub struct CredentialHasher {
    cost: u32,
}

impl CredentialHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, secret: &str) -> Result<String, BcryptError> {
        hash(prehash(secret), self.cost)
    }

    /// Constant-time check of `secret` against a stored hash
    pub fn verify(&self, secret: &str, stored_hash: &str) -> Result<bool, BcryptError> {
        verify(prehash(secret), stored_hash)
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

/// Lowercase hex SHA-256 of the secret
pub fn prehash(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Constant-time comparison of a submitted secret with the configured one.
/// Only the length of `expected` can leak through timing.
pub fn secret_matches(candidate: &str, expected: &str) -> bool {
    candidate.as_bytes().ct_eq(expected.as_bytes()).into()
}
