//! Password hashing using argon2
//!
//! Digests are PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`), so
//! verification always uses the parameters a digest was created with.
//!
//! # Performance Considerations
//!
//! Argon2 is intentionally CPU and memory intensive. Request handlers use the
//! `*_async` variants, which run on the blocking thread pool.

use anyhow::Result;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;

/// Digest checked when no stored digest exists, so unknown users cost a full verify
static DUMMY_DIGEST: Lazy<String> =
    Lazy::new(|| PasswordService::hash("job-tracker-unknown-user").unwrap_or_default());

/// Password hashing service
///
/// Uses Argon2id, the recommended variant for password hashing.
pub struct PasswordService;

impl PasswordService {
    /// Hash a password with a fresh random salt (blocking operation)
    pub fn hash(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
        Ok(hash.to_string())
    }

    /// Hash a password asynchronously (non-blocking)
    pub async fn hash_async(password: String) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::hash(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a password against a stored digest (blocking operation)
    ///
    /// An empty or unparsable digest never matches.
    pub fn verify(password: &str, hash: &str) -> bool {
        if hash.is_empty() {
            return false;
        }
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            tracing::warn!("Stored password digest is not a valid PHC string");
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Verify a password asynchronously (non-blocking)
    pub async fn verify_async(password: String, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))
    }

    /// Run a verify against a fixed digest and discard the result
    ///
    /// Used when the user does not exist, so the response takes as long as a
    /// wrong password would.
    pub async fn verify_dummy_async(password: String) -> Result<()> {
        tokio::task::spawn_blocking(move || {
            let _ = Self::verify(&password, &DUMMY_DIGEST);
        })
        .await
        .map_err(|e| anyhow::anyhow!("Task join error: {}", e))
    }
}
