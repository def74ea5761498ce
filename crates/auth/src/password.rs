//! Password hashing and verification.
//!
//! Digests are Argon2id PHC strings (`$argon2id$v=19$...`), which carry their
//! own salt and parameters.

use std::sync::Arc;

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("stored password hash is malformed")]
    InvalidHashFormat,

    #[error("password verification failed: {0}")]
    Verification(String),
}

/// One-way password hashing contract.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError>;

    /// `Ok(false)` on mismatch; `Err` only for a broken digest or hasher.
    fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, PasswordError>;
}

/// Argon2id hasher with a random salt per hash.
#[derive(Debug, Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Library-default Argon2id parameters.
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Custom cost parameters (memory in KiB, iterations, parallelism).
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, PasswordError> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| PasswordError::Hashing(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| PasswordError::Hashing(e.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(digest).map_err(|_| PasswordError::InvalidHashFormat)?;

        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::Verification(e.to_string())),
        }
    }
}

/// Hash on tokio's blocking pool so Argon2 does not stall async workers.
pub async fn hash_blocking(hasher: Arc<dyn PasswordHasher>, plaintext: &str) -> Result<String, PasswordError> {
    let plaintext = plaintext.to_string();
    tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
        .await
        .map_err(|e| PasswordError::Hashing(format!("hashing task failed: {e}")))?
}

/// [`PasswordHasher::verify`] on tokio's blocking pool.
pub async fn verify_blocking(
    hasher: Arc<dyn PasswordHasher>,
    plaintext: &str,
    digest: &str,
) -> Result<bool, PasswordError> {
    let plaintext = plaintext.to_string();
    let digest = digest.to_string();
    tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &digest))
        .await
        .map_err(|e| PasswordError::Verification(format!("verification task failed: {e}")))?
}

#[cfg(test)]
pub(crate) fn test_hasher() -> Argon2PasswordHasher {
    Argon2PasswordHasher::with_params(1024, 1, 1).expect("valid argon2 params")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hasher = test_hasher();
        let digest = hasher.hash("Abc123").unwrap();

        assert!(digest.starts_with("$argon2id$"));
        assert!(!digest.contains("Abc123"));
        assert!(hasher.verify("Abc123", &digest).unwrap());
        assert!(!hasher.verify("abc123", &digest).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        let hasher = test_hasher();
        assert_ne!(hasher.hash("Abc123").unwrap(), hasher.hash("Abc123").unwrap());
    }

    #[test]
    fn malformed_digest_is_an_error() {
        let hasher = test_hasher();
        assert_eq!(hasher.verify("Abc123", "plaintext"), Err(PasswordError::InvalidHashFormat));
    }

    #[tokio::test]
    async fn blocking_pool_helpers_hash_and_verify() {
        let hasher: Arc<dyn PasswordHasher> = Arc::new(test_hasher());
        let digest = hash_blocking(hasher.clone(), "Abc123").await.unwrap();

        assert!(verify_blocking(hasher.clone(), "Abc123", &digest).await.unwrap());
        assert!(!verify_blocking(hasher.clone(), "Abc124", &digest).await.unwrap());
        assert_eq!(
            verify_blocking(hasher, "Abc123", "nope").await,
            Err(PasswordError::InvalidHashFormat)
        );
    }

    #[test]
    fn digests_verify_across_parameter_sets() {
        // PHC strings carry their own parameters.
        let digest = test_hasher().hash("Abc123").unwrap();
        assert!(Argon2PasswordHasher::new().verify("Abc123", &digest).unwrap());
    }
}
