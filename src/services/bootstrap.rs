//! First-run setup: make sure the administrative account exists before the
//! service starts taking calls.

use std::io;

use crate::{
    models::user::AuthType,
    services::{
        credentials::{CredentialError, CredentialVerifier},
        directory::{AccountDirectory, DirectoryError},
    },
};

/// Reserved administrative username.
pub const ADMIN_USERNAME: &str = "admin";

/// Source of masked password input. Reads block, so callers run them off the
/// async workers.
pub trait PasswordPrompt {
    fn read_password(&mut self, prompt: &str) -> io::Result<String>;
}

/// Reads from the controlling terminal with echo disabled. `rpassword`
/// restores the terminal mode before returning, on success and on error.
pub struct TerminalPrompt;

impl PasswordPrompt for TerminalPrompt {
    fn read_password(&mut self, prompt: &str) -> io::Result<String> {
        rpassword::prompt_password(prompt)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("error creating the admin user: {0}")]
    Lookup(#[source] DirectoryError),
    #[error("error creating the admin user: error reading the password: {0}")]
    Prompt(#[from] io::Error),
    #[error("error creating the admin user: passwords don't match")]
    Mismatch,
    #[error("error creating the admin user: {0}")]
    Credential(#[from] CredentialError),
    #[error("error creating the admin user: {0}")]
    Create(#[source] DirectoryError),
}

impl From<tokio::task::JoinError> for BootstrapError {
    fn from(e: tokio::task::JoinError) -> Self {
        BootstrapError::Prompt(io::Error::new(io::ErrorKind::Other, e.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    AlreadyPresent,
    Created,
}

/// Ensure the `admin` account exists, asking for its password twice if not.
///
/// Never retries. Either the account is fully created or an error is
/// returned and nothing was written; the caller decides to exit.
pub async fn ensure_admin<P>(
    directory: &AccountDirectory,
    verifier: &CredentialVerifier,
    mut prompt: P,
) -> Result<BootstrapOutcome, BootstrapError>
where
    P: PasswordPrompt + Send + 'static,
{
    match directory.find_by_username(ADMIN_USERNAME).await {
        Ok(_) => return Ok(BootstrapOutcome::AlreadyPresent),
        Err(DirectoryError::NotFound) => {}
        Err(e) => return Err(BootstrapError::Lookup(e)),
    }

    tracing::info!("no {ADMIN_USERNAME} user found, asking for its password");

    let password =
        tokio::task::spawn_blocking(move || read_confirmed_password(&mut prompt)).await??;

    verifier.check_strength(&password)?;
    let password_hash = verifier.hash_password(&password).await?;

    directory
        .create(ADMIN_USERNAME, password_hash, AuthType::Local)
        .await
        .map_err(BootstrapError::Create)?;

    tracing::info!("{ADMIN_USERNAME} user created");
    Ok(BootstrapOutcome::Created)
}

/// Two captures compared byte-for-byte; surrounding whitespace is trimmed
/// only after they match.
fn read_confirmed_password<P: PasswordPrompt>(prompt: &mut P) -> Result<String, BootstrapError> {
    let first = prompt.read_password("Please, set the admin password: ")?;
    let second = prompt.read_password("Please, repeat admin password: ")?;

    if first.as_bytes() != second.as_bytes() {
        return Err(BootstrapError::Mismatch);
    }

    Ok(first.trim().to_string())
}
