//! Account directory: uniqueness and soft-delete visibility over a [`UserStore`].

use std::sync::Arc;

use chrono::Utc;

use crate::{
    db::store::{StoreError, UserFilter, UserStore},
    models::user::{AuthType, NewUser, User, UserSummary},
};

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("not found")]
    NotFound,
    #[error("already exists")]
    AlreadyExists,
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for DirectoryError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UniqueViolation => DirectoryError::AlreadyExists,
            other => DirectoryError::Store(other),
        }
    }
}

/// Only active (non-deleted) records are ever visible through the directory.
#[derive(Clone)]
pub struct AccountDirectory {
    store: Arc<dyn UserStore>,
}

impl AccountDirectory {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Insert a new account. The uniqueness check and the write happen
    /// atomically in the store, so concurrent creates can't both succeed.
    pub async fn create(
        &self,
        username: &str,
        password_hash: String,
        auth_type: AuthType,
    ) -> Result<User, DirectoryError> {
        let user = self
            .store
            .insert(NewUser {
                username: username.to_string(),
                password_hash,
                auth_type,
            })
            .await?;

        tracing::debug!(username = %user.username, id = user.id, "user created");
        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<User, DirectoryError> {
        self.store
            .find_one(&UserFilter::active().username(username))
            .await?
            .ok_or(DirectoryError::NotFound)
    }

    /// Mark the active record as deleted. A record deleted concurrently
    /// between the lookup and the write reports `NotFound`.
    pub async fn soft_delete(&self, username: &str) -> Result<(), DirectoryError> {
        let mut user = self.find_by_username(username).await?;
        user.deleted_at = Some(Utc::now());

        if !self.store.update(&user).await? {
            return Err(DirectoryError::NotFound);
        }

        tracing::debug!(username = %user.username, id = user.id, "user soft-deleted");
        Ok(())
    }

    /// Active records in identity order, without credential material.
    pub async fn list_active(&self) -> Result<Vec<UserSummary>, DirectoryError> {
        let users = self.store.list(&UserFilter::active()).await?;
        Ok(users.into_iter().map(UserSummary::from).collect())
    }
}
