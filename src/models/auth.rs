use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims embedded in a session token.
///
/// `usr` and `first_issued` are optional on the wire so that a structurally
/// incomplete token still parses and can be rejected explicitly on renewal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usr: Option<String>,
    /// Unix seconds of the login that started this session, kept across renewals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_issued: Option<i64>,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly signed token and the instant it stops being valid.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Metadata key carrying the bearer token on a call.
pub const TOKEN_METADATA_KEY: &str = "tkn";

/// Metadata attached to an inbound call.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    metadata: HashMap<String, String>,
}

impl CallContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// The bearer token, if the caller sent a non-empty one.
    pub fn token(&self) -> Option<&str> {
        self.get(TOKEN_METADATA_KEY).filter(|t| !t.is_empty())
    }
}
