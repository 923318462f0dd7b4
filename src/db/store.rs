use async_trait::async_trait;

use crate::models::user::{NewUser, User};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An active row with the same username already exists.
    #[error("an active user with that username already exists")]
    UniqueViolation,
    #[error("{0}")]
    Database(String),
}

/// Predicate over user rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub username: Option<String>,
    pub active_only: bool,
}

impl UserFilter {
    /// Rows whose soft-delete marker is unset.
    pub fn active() -> Self {
        Self { username: None, active_only: true }
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn matches(&self, user: &User) -> bool {
        if self.active_only && !user.is_active() {
            return false;
        }
        match &self.username {
            Some(name) => &user.username == name,
            None => true,
        }
    }
}

/// Persistence capability behind the account directory.
///
/// Implementations own atomicity: `insert` must check for an active row with
/// the same username and write in one step, and `update` must only touch a
/// row that is still active at write time.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new active row, stamping `created_at = updated_at = now`.
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;

    /// First row (in identity order) matching `filter`.
    async fn find_one(&self, filter: &UserFilter) -> Result<Option<User>, StoreError>;

    /// Persist `user` over the active row with the same id, advancing
    /// `updated_at`. Returns `false` when no active row matched.
    async fn update(&self, user: &User) -> Result<bool, StoreError>;

    /// All rows matching `filter`, in identity order.
    async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, StoreError>;
}
