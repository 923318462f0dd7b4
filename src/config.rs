use std::env;

use crate::services::credentials::DEFAULT_BCRYPT_COST;

/// Longest accepted token lifespan: one year.
pub const MAX_TOKENS_LIFESPAN_SECONDS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub tokens_secret: String,
    pub tokens_lifespan_seconds: u64,
    pub bcrypt_cost: u32,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Read once at start; nothing here changes for the life of the process.
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Self {
            database_url: required("DATABASE_URL")?,
            tokens_secret: required("TOKENS_SECRET")?,
            tokens_lifespan_seconds: env::var("TOKENS_LIFESPAN_SECONDS")
                .unwrap_or_else(|_| "14400".into())
                .parse()?,
            bcrypt_cost: env::var("BCRYPT_COST")
                .unwrap_or_else(|_| DEFAULT_BCRYPT_COST.to_string())
                .parse()?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tokens_secret.is_empty() {
            anyhow::bail!("TOKENS_SECRET must not be empty");
        }
        if !(1..=MAX_TOKENS_LIFESPAN_SECONDS).contains(&self.tokens_lifespan_seconds) {
            anyhow::bail!(
                "TOKENS_LIFESPAN_SECONDS must be between 1 and {}, got {}",
                MAX_TOKENS_LIFESPAN_SECONDS,
                self.tokens_lifespan_seconds
            );
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            anyhow::bail!("BCRYPT_COST must be between 4 and 31, got {}", self.bcrypt_cost);
        }
        Ok(())
    }

    pub fn tokens_lifespan(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.tokens_lifespan_seconds as i64)
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).map_err(|_| anyhow::anyhow!("Missing required env var: {}", key))
}
