//! Argon2id secret hashing and verification.
//!
//! Used for both per-seat member passwords and club-wide access codes.
//! Verification is constant-time via the `argon2` crate's verifier.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use clubscreen_core::error::AppError;

/// Handles secret hashing and verification using Argon2id.
#[derive(Debug, Clone, Default)]
pub struct SecretHasher;

impl SecretHasher {
    /// Creates a new hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hashes a plaintext secret using Argon2id with a random salt.
    pub fn hash_secret(&self, secret: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Secret hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext secret against a stored Argon2id hash.
    ///
    /// Returns `Ok(true)` if the secret matches, `Ok(false)` if not.
    pub fn verify_secret(&self, secret: &str, hash: &str) -> Result<bool, AppError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid secret hash format: {e}")))?;

        let argon2 = Argon2::default();
        match argon2.verify_password(secret.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Secret verification failed: {e}"
            ))),
        }
    }
}
