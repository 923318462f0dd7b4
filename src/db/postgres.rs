use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::store::{StoreError, UserFilter, UserStore};
use crate::models::user::{NewUser, User};

const USER_COLUMNS: &str =
    "id, username, password_hash, auth_type, created_at, updated_at, deleted_at";

/// DB row struct: auth_type is stored as TEXT and parsed on the way out.
#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
    auth_type: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            auth_type: row
                .auth_type
                .parse()
                .map_err(|e: anyhow::Error| StoreError::Database(e.to_string()))?,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        })
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

fn map_insert_error(e: sqlx::Error) -> StoreError {
    let unique = e
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());
    if unique {
        StoreError::UniqueViolation
    } else {
        e.into()
    }
}

/// Builds the WHERE clause for `filter`. The username, when present, is bound as `$1`.
fn where_clause(filter: &UserFilter) -> String {
    let mut conds = vec!["TRUE"];
    if filter.active_only {
        conds.push("deleted_at IS NULL");
    }
    if filter.username.is_some() {
        conds.push("username = $1");
    }
    conds.join(" AND ")
}

/// [`UserStore`] over the `users` table. Uniqueness among active rows is
/// enforced by the partial unique index from the migrations.
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (username, password_hash, auth_type)
             VALUES ($1, $2, $3)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.auth_type.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)?;

        row.try_into()
    }

    async fn find_one(&self, filter: &UserFilter) -> Result<Option<User>, StoreError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE {} ORDER BY id ASC LIMIT 1",
            where_clause(filter)
        );
        let mut query = sqlx::query_as::<_, UserRow>(&sql);
        if let Some(username) = &filter.username {
            query = query.bind(username);
        }

        query
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn update(&self, user: &User) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE users
             SET password_hash = $2, auth_type = $3, deleted_at = $4, updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(user.id)
        .bind(&user.password_hash)
        .bind(user.auth_type.to_string())
        .bind(user.deleted_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, StoreError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE {} ORDER BY id ASC",
            where_clause(filter)
        );
        let mut query = sqlx::query_as::<_, UserRow>(&sql);
        if let Some(username) = &filter.username {
            query = query.bind(username);
        }

        query
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }
}
