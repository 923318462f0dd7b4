//! In-process [`UserStore`], used by the tests and for local development.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::store::{StoreError, UserFilter, UserStore};
use crate::models::user::{NewUser, User};

#[derive(Default)]
struct Inner {
    next_id: i64,
    rows: Vec<User>,
}

/// Rows live in a `Vec` in insertion order; every operation runs under one lock.
#[derive(Default)]
pub struct MemoryUserStore {
    inner: Mutex<Inner>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner.lock().map_err(|e| StoreError::Database(e.to_string()))
    }

    /// Every row, soft-deleted ones included.
    pub fn snapshot(&self) -> Result<Vec<User>, StoreError> {
        let inner = self.lock()?;
        Ok(inner.rows.clone())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let mut inner = self.lock()?;

        if inner.rows.iter().any(|u| u.is_active() && u.username == user.username) {
            return Err(StoreError::UniqueViolation);
        }

        inner.next_id += 1;
        let now = Utc::now();
        let row = User {
            id: inner.next_id,
            username: user.username,
            password_hash: user.password_hash,
            auth_type: user.auth_type,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        inner.rows.push(row.clone());
        Ok(row)
    }

    async fn find_one(&self, filter: &UserFilter) -> Result<Option<User>, StoreError> {
        let inner = self.lock()?;
        Ok(inner.rows.iter().find(|u| filter.matches(u)).cloned())
    }

    async fn update(&self, user: &User) -> Result<bool, StoreError> {
        let mut inner = self.lock()?;

        let Some(row) = inner.rows.iter_mut().find(|u| u.id == user.id && u.is_active()) else {
            return Ok(false);
        };
        row.password_hash = user.password_hash.clone();
        row.auth_type = user.auth_type;
        row.deleted_at = user.deleted_at;
        row.updated_at = Utc::now();
        Ok(true)
    }

    async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, StoreError> {
        let inner = self.lock()?;
        Ok(inner.rows.iter().filter(|u| filter.matches(u)).cloned().collect())
    }
}
