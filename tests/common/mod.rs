#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use warden_api::{
    db::{MemoryUserStore, StoreError, UserFilter, UserStore},
    models::user::{AuthType, NewUser, User},
    services::{
        auth::AuthService, credentials::CredentialVerifier, directory::AccountDirectory,
        tokens::TokenService,
    },
};

pub const SECRET: &str = "tests-secret";

/// bcrypt of `f0cKt3Rf$`.
pub const NEFIX_HASH: &str = "$2y$12$JGfbXRGMBgDxMVhR9tT6B.C3xmAFM1BxkHD6.F0eUS5ugGXcZ5mUq";
pub const NEFIX_PASSWORD: &str = "f0cKt3Rf$";

pub fn lifespan() -> Duration {
    Duration::minutes(240)
}

pub fn token_service() -> TokenService {
    TokenService::new(SECRET, lifespan())
}

pub fn auth_service(store: Arc<dyn UserStore>) -> AuthService {
    AuthService::new(
        AccountDirectory::new(store),
        CredentialVerifier::new(4),
        token_service(),
    )
}

/// Memory store whose operations can be switched to fail with "testing error".
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryUserStore,
    pub fail_insert: AtomicBool,
    pub fail_find: AtomicBool,
    pub fail_update: AtomicBool,
    pub fail_list: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check(flag: &AtomicBool) -> Result<(), StoreError> {
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Database("testing error".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for FlakyStore {
    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        Self::check(&self.fail_insert)?;
        self.inner.insert(user).await
    }

    async fn find_one(&self, filter: &UserFilter) -> Result<Option<User>, StoreError> {
        Self::check(&self.fail_find)?;
        self.inner.find_one(filter).await
    }

    async fn update(&self, user: &User) -> Result<bool, StoreError> {
        Self::check(&self.fail_update)?;
        self.inner.update(user).await
    }

    async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, StoreError> {
        Self::check(&self.fail_list)?;
        self.inner.list(filter).await
    }
}

pub async fn seed(store: &dyn UserStore, username: &str, password_hash: &str) -> User {
    store
        .insert(NewUser {
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            auth_type: AuthType::Local,
        })
        .await
        .unwrap()
}
