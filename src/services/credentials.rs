//! Password hashing, verification and strength policy.

use bcrypt::{hash, verify};

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Cost used when none is configured.
pub const DEFAULT_BCRYPT_COST: u32 = 12;

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// The stored hash is not a structurally valid bcrypt hash.
    #[error("{0}")]
    Format(String),
    #[error("the password requires, at least, a length of {min} characters")]
    WeakPassword { min: usize },
    #[error("error hashing the password: {0}")]
    Hashing(String),
}

/// Stateless apart from the bcrypt cost. Hashing is CPU-bound and runs on the
/// blocking thread pool so concurrent calls don't stall the runtime.
#[derive(Debug, Clone, Copy)]
pub struct CredentialVerifier {
    cost: u32,
}

impl Default for CredentialVerifier {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

impl CredentialVerifier {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Salted bcrypt hash of `plaintext`.
    pub async fn hash_password(&self, plaintext: &str) -> Result<String, CredentialError> {
        let plaintext = plaintext.to_string();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || {
            hash(plaintext, cost).map_err(|e| CredentialError::Hashing(e.to_string()))
        })
        .await
        .map_err(|e| CredentialError::Hashing(format!("task join error: {e}")))?
    }

    /// `Ok(false)` on a wrong password; `Err(Format)` when `stored_hash` itself
    /// is unusable, so callers can tell the two apart.
    pub async fn verify_password(
        &self,
        plaintext: &str,
        stored_hash: &str,
    ) -> Result<bool, CredentialError> {
        let plaintext = plaintext.to_string();
        let stored_hash = stored_hash.to_string();

        tokio::task::spawn_blocking(move || {
            verify(plaintext, &stored_hash).map_err(|e| CredentialError::Format(e.to_string()))
        })
        .await
        .map_err(|e| CredentialError::Hashing(format!("task join error: {e}")))?
    }

    pub fn check_strength(&self, plaintext: &str) -> Result<(), CredentialError> {
        if plaintext.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(CredentialError::WeakPassword { min: MIN_PASSWORD_LENGTH });
        }
        Ok(())
    }
}
