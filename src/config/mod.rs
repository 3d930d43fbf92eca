//! Application configuration management

use std::env;

use anyhow::{Context, Result, bail};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// SQLite connection URL, e.g. `sqlite:./data/catalog.db`
    pub database_url: String,

    /// Maximum number of pooled database connections
    pub database_max_connections: u32,

    /// JWT secret for signing and verifying bearer tokens
    pub jwt_secret: String,

    /// The shared password every user logs in with
    pub login_password: String,

    /// Token lifetime in seconds
    pub token_lifetime: i64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is required")?;
        let login_password = env::var("LOGIN_PASSWORD").context("LOGIN_PASSWORD is required")?;
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:./data/catalog.db".to_string());
        check_database_url(&database_url)?;

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .context("Invalid PORT")?,

            database_url,

            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),

            // Trim any whitespace/newlines picked up from secret files
            jwt_secret: jwt_secret.trim().to_string(),

            login_password,

            token_lifetime: env::var("TOKEN_LIFETIME")
                .unwrap_or_else(|_| "86400".to_string())
                .parse()
                .context("Invalid TOKEN_LIFETIME")?,
        })
    }

    /// The auth settings derived from this configuration
    pub fn auth(&self) -> crate::services::AuthConfig {
        crate::services::AuthConfig {
            jwt_secret: self.jwt_secret.clone(),
            login_password: self.login_password.clone(),
            token_lifetime: self.token_lifetime,
        }
    }
}

/// Only SQLite URLs are supported
fn check_database_url(url: &str) -> Result<()> {
    if !url.starts_with("sqlite:") {
        bail!("DATABASE_URL must be a sqlite: URL, got {}", url);
    }
    Ok(())
}
