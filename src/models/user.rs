use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a user's credentials are checked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    Local,
}

impl std::fmt::Display for AuthType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AuthType::Local => "local",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for AuthType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(AuthType::Local),
            _ => Err(anyhow::anyhow!("Unknown auth type: {s}")),
        }
    }
}

/// A persisted account. Never hard-deleted: `deleted_at` marks it as gone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub auth_type: AuthType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// Fields supplied by the caller when inserting; the store fills in the rest.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub auth_type: AuthType,
}

/// Caller-visible projection of a user. Carries no credential material.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSummary {
    #[serde(rename = "usr")]
    pub username: String,
    pub auth_type: AuthType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserSummary {
    fn from(u: User) -> Self {
        Self {
            username: u.username,
            auth_type: u.auth_type,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

// Request/Response DTOs
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub usr: String,
    pub pwd: String,
}

#[derive(Debug, Deserialize)]
pub struct AddUserRequest {
    pub usr: String,
    pub pwd: String,
}

/// Returned by both login and token renewal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub tkn: String,
    pub tkn_expiration: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<UserSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_type_text_round_trip() {
        assert_eq!(AuthType::Local.to_string(), "local");
        assert_eq!("local".parse::<AuthType>().unwrap(), AuthType::Local);
        assert!("ldap".parse::<AuthType>().is_err());
    }

    #[test]
    fn test_user_serialization_hides_password_hash() {
        let now = Utc::now();
        let user = User {
            id: 1,
            username: "nefix".into(),
            password_hash: "$2b$04$secret".into(),
            auth_type: AuthType::Local,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());

        let summary = serde_json::to_value(UserSummary::from(user)).unwrap();
        assert_eq!(summary["usr"], "nefix");
        assert_eq!(summary["auth_type"], "local");
        assert!(summary.get("password_hash").is_none());
    }
}
