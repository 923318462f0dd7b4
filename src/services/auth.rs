use crate::{
    models::{
        auth::CallContext,
        status::{Code, Status},
        user::{AuthType, TokenResponse, UserListResponse},
    },
    services::{
        credentials::{CredentialError, CredentialVerifier},
        directory::{AccountDirectory, DirectoryError},
        tokens::TokenService,
    },
};

/// The five caller-facing account operations.
///
/// Every failure leaves here as a [`Status`]; component errors are mapped in
/// this module and nowhere else.
#[derive(Clone)]
pub struct AuthService {
    directory: AccountDirectory,
    verifier: CredentialVerifier,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(
        directory: AccountDirectory,
        verifier: CredentialVerifier,
        tokens: TokenService,
    ) -> Self {
        Self { directory, verifier, tokens }
    }

    /// Check credentials and start a new session.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, Status> {
        let user = self.directory.find_by_username(username).await.map_err(|e| {
            let status = match e {
                DirectoryError::NotFound => {
                    Status::not_found(format!("error logging in: user \"{username}\" not found"))
                }
                other => Status::internal(format!("error logging in: {other}")),
            };
            log_failure("login", username, &status);
            status
        })?;

        let matched = self
            .verifier
            .verify_password(password, &user.password_hash)
            .await
            .map_err(|e| {
                let status = match e {
                    CredentialError::Format(detail) => {
                        Status::internal(format!("error logging in: password error: {detail}"))
                    }
                    other => Status::internal(format!("error logging in: {other}")),
                };
                log_failure("login", username, &status);
                status
            })?;

        if !matched {
            let status = Status::unauthenticated("error logging in: incorrect password");
            log_failure("login", username, &status);
            return Err(status);
        }

        let issued = self.tokens.issue(&user.username).map_err(|e| {
            let status = Status::internal(format!("error logging in: {e}"));
            log_failure("login", username, &status);
            status
        })?;

        tracing::info!(username = %user.username, "user logged in");
        Ok(TokenResponse {
            tkn: issued.token,
            tkn_expiration: issued.expires_at,
        })
    }

    /// Extend the caller's session with a fresh token.
    pub async fn renew_token(&self, ctx: &CallContext) -> Result<TokenResponse, Status> {
        let Some(token) = ctx.token() else {
            let status = Status::unauthenticated("not authenticated");
            log_failure("renew_token", "", &status);
            return Err(status);
        };

        let issued = self.tokens.renew(token).map_err(|e| {
            tracing::debug!(error = %e, "token renewal rejected");
            let status = Status::internal(
                "error renewing the token: the token is invalid or can't be renewed",
            );
            log_failure("renew_token", "", &status);
            status
        })?;

        Ok(TokenResponse {
            tkn: issued.token,
            tkn_expiration: issued.expires_at,
        })
    }

    /// Create a local account.
    pub async fn add_user(&self, username: &str, password: &str) -> Result<(), Status> {
        self.verifier.check_strength(password).map_err(|e| {
            let status = Status::invalid_argument(e.to_string());
            log_failure("add_user", username, &status);
            status
        })?;

        let password_hash = self.verifier.hash_password(password).await.map_err(|e| {
            let status = Status::internal(format!("error adding the user \"{username}\": {e}"));
            log_failure("add_user", username, &status);
            status
        })?;

        self.directory
            .create(username, password_hash, AuthType::Local)
            .await
            .map_err(|e| {
                let status = match e {
                    DirectoryError::AlreadyExists => Status::already_exists(format!(
                        "error adding the user \"{username}\": already exists"
                    )),
                    other => Status::internal(format!("error adding the user to the DB: {other}")),
                };
                log_failure("add_user", username, &status);
                status
            })?;

        tracing::info!(username = %username, "user added");
        Ok(())
    }

    /// Soft-delete an account.
    pub async fn delete_user(&self, username: &str) -> Result<(), Status> {
        let map = |e: DirectoryError| {
            let status = match e {
                DirectoryError::NotFound => {
                    Status::not_found(format!("error deleting the user \"{username}\": not found"))
                }
                other => Status::internal(format!(
                    "error deleting the user \"{username}\": {other}"
                )),
            };
            log_failure("delete_user", username, &status);
            status
        };

        self.directory.find_by_username(username).await.map_err(map)?;
        self.directory.soft_delete(username).await.map_err(map)?;

        tracing::info!(username = %username, "user deleted");
        Ok(())
    }

    pub async fn list_users(&self) -> Result<UserListResponse, Status> {
        let users = self.directory.list_active().await.map_err(|e| {
            let status = Status::internal(format!("error getting the list of users: {e}"));
            log_failure("list_users", "", &status);
            status
        })?;

        Ok(UserListResponse { users })
    }
}

fn log_failure(operation: &str, username: &str, status: &Status) {
    match status.code {
        Code::Internal => tracing::error!(
            operation,
            username,
            code = ?status.code,
            "{}",
            status.message
        ),
        _ => tracing::warn!(
            operation,
            username,
            code = ?status.code,
            "{}",
            status.message
        ),
    }
}
