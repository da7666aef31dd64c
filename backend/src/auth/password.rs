//! Password hashing
//!
//! bcrypt digests (`$2b$<cost>$...`) with a random salt per call. Hashing is
//! CPU-bound, so the async wrappers move it onto the blocking pool.

use thiserror::Error;

/// Password hashing errors
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Hashing failed: {0}")]
    HashFailed(String),

    #[error("Hashing task failed: {0}")]
    TaskFailed(String),
}

/// Hash `plaintext` with the given work factor
pub fn hash_password(plaintext: &str, cost: u32) -> Result<String, PasswordError> {
    bcrypt::hash(plaintext, cost).map_err(|e| PasswordError::HashFailed(e.to_string()))
}

/// Check `plaintext` against `digest`. A malformed digest never matches.
pub fn verify_password(plaintext: &str, digest: &str) -> bool {
    bcrypt::verify(plaintext, digest).unwrap_or(false)
}

/// Async front for [`hash_password`] and [`verify_password`]
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy_digest: String,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Result<Self, PasswordError> {
        // Verified against when the username is unknown.
        let dummy_digest = hash_password("dummy-password-for-timing", cost)?;
        Ok(Self { cost, dummy_digest })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub async fn hash(&self, plaintext: String) -> Result<String, PasswordError> {
        let cost = self.cost;
        tokio::task::spawn_blocking(move || hash_password(&plaintext, cost))
            .await
            .map_err(|e| PasswordError::TaskFailed(e.to_string()))?
    }

    pub async fn verify(&self, plaintext: String, digest: String) -> bool {
        match tokio::task::spawn_blocking(move || verify_password(&plaintext, &digest)).await {
            Ok(matched) => matched,
            Err(e) => {
                tracing::error!("Password verification task failed: {}", e);
                false
            }
        }
    }

    /// Burn one verification so unknown usernames cost the same as wrong passwords
    pub async fn verify_dummy(&self, plaintext: String) {
        let _ = self.verify(plaintext, self.dummy_digest.clone()).await;
    }
}
