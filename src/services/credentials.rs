//! One-way password hashing with Argon2id.
//!
//! The cost parameters are read once from [`SecurityConfig`] and shared by every
//! hash produced by the process. Verification reads the parameters embedded in
//! the stored PHC string, so digests made under older settings still verify.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;
use tokio::task;

use crate::config::SecurityConfig;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Password is required")]
    EmptyPassword,

    #[error("Invalid Argon2 params: {0}")]
    InvalidParams(String),

    #[error("Failed to hash password: {0}")]
    Hash(String),

    #[error("Password task failed: {0}")]
    Task(String),
}

#[derive(Clone)]
pub struct CredentialEngine {
    params: Params,
}

impl CredentialEngine {
    pub fn new(config: &SecurityConfig) -> Result<Self, CredentialError> {
        let params = Params::new(
            config.argon2_memory_cost_kib,
            config.argon2_time_cost,
            config.argon2_parallelism,
            None,
        )
        .map_err(|e| CredentialError::InvalidParams(e.to_string()))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password with a fresh random salt.
    pub fn hash(&self, plaintext: &str) -> Result<String, CredentialError> {
        if plaintext.is_empty() {
            return Err(CredentialError::EmptyPassword);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| CredentialError::Hash(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Check a plaintext password against a stored digest.
    /// A malformed digest is a mismatch, not an error.
    #[must_use]
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(digest) else {
            return false;
        };

        self.argon2()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }

    /// [`Self::hash`] on the blocking pool; Argon2 would otherwise stall the runtime.
    pub async fn hash_blocking(&self, plaintext: String) -> Result<String, CredentialError> {
        let engine = self.clone();
        task::spawn_blocking(move || engine.hash(&plaintext))
            .await
            .map_err(|e| CredentialError::Task(e.to_string()))?
    }

    pub async fn verify_blocking(
        &self,
        plaintext: String,
        digest: String,
    ) -> Result<bool, CredentialError> {
        let engine = self.clone();
        task::spawn_blocking(move || engine.verify(&plaintext, &digest))
            .await
            .map_err(|e| CredentialError::Task(e.to_string()))
    }
}
