//! Session token issuance, parsing and renewal.
//!
//! Tokens are HS256 JWTs signed with the process-wide secret. Parsing checks
//! the signature only; expiry is enforced by [`TokenService::validate`] for
//! callers that need it, since renewal must accept a token past its `exp`.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::models::auth::{IssuedToken, SessionClaims};

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("the token has expired")]
    Expired,
    #[error("error signing the token: {0}")]
    Encoding(String),
}

/// Pure function of its input plus the secret and lifespan fixed at construction.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifespan: Duration,
}

impl TokenService {
    pub fn new(secret: &str, lifespan: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifespan,
        }
    }

    pub fn lifespan(&self) -> Duration {
        self.lifespan
    }

    /// Start a new session for `username`.
    pub fn issue(&self, username: &str) -> Result<IssuedToken, TokenError> {
        let now = Utc::now().trunc_subsecs(0);
        self.issue_at(username, now.timestamp(), now)
    }

    fn issue_at(
        &self,
        username: &str,
        first_issued: i64,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let expires_at = now
            .checked_add_signed(self.lifespan)
            .ok_or_else(|| TokenError::Encoding("token lifespan out of range".to_string()))?;
        let claims = SessionClaims {
            usr: Some(username.to_string()),
            first_issued: Some(first_issued),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = self.sign(&claims)?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Sign arbitrary claims with the process secret.
    pub fn sign(&self, claims: &SessionClaims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verify the signature and decode the claims. Does not look at `exp`.
    pub fn parse(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::Invalid(e.to_string()))
    }

    /// [`parse`](Self::parse) plus the standard expiry check.
    pub fn validate(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let claims = self.parse(token)?;
        if claims.exp <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    /// Issue a successor token for the same session. Works on tokens already
    /// past their `exp`; `first_issued` is carried over unchanged.
    ///
    /// The new window never ends at or before the old `exp`, even when the
    /// renewal lands in the same second as the previous issuance.
    pub fn renew(&self, token: &str) -> Result<IssuedToken, TokenError> {
        let claims = self.parse(token)?;

        let (Some(username), Some(first_issued)) = (claims.usr, claims.first_issued) else {
            return Err(TokenError::Invalid("missing session claims".to_string()));
        };
        if username.is_empty() {
            return Err(TokenError::Invalid("empty subject".to_string()));
        }

        let now = Utc::now().trunc_subsecs(0);
        let earliest_start = claims
            .exp
            .checked_add(1)
            .and_then(|t| t.checked_sub(self.lifespan.num_seconds()))
            .and_then(|t| DateTime::<Utc>::from_timestamp(t, 0))
            .ok_or_else(|| TokenError::Invalid("expiry out of range".to_string()))?;

        self.issue_at(&username, first_issued, now.max(earliest_start))
    }
}
