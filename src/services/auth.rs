//! Authentication service: shared-password login and JWT handling
//!
//! Every user logs in with the same process-wide password (`LOGIN_PASSWORD`).

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{Database, DbError, UserRecord};

// ============================================================================
// JWT Claims
// ============================================================================

/// Claims embedded in a bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Username at signing time
    pub username: String,
    /// User ID
    pub id: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password
    #[error("wrong credentials")]
    InvalidCredentials,

    /// Signature, format or expiry check failed
    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Database(#[from] DbError),
}

// ============================================================================
// Configuration
// ============================================================================

/// Auth service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Password shared by all users
    pub login_password: String,
    /// Token lifetime in seconds
    pub token_lifetime: i64,
}

// ============================================================================
// Auth Service
// ============================================================================

#[derive(Clone)]
pub struct AuthService {
    db: Database,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(db: Database, config: AuthConfig) -> Self {
        Self { db, config }
    }

    /// Check credentials and return a signed token for the user
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let user = self.db.users().get_by_username(username).await?;

        let user = match user {
            Some(user) if password == self.config.login_password => user,
            _ => return Err(AuthError::InvalidCredentials),
        };

        let token = self.generate_token(&user)?;
        tracing::info!(user_id = %user.id, username = %user.username, "User logged in");
        Ok(token)
    }

    /// Sign a token carrying the user's name and id
    pub fn generate_token(&self, user: &UserRecord) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = TokenClaims {
            username: user.username.clone(),
            id: user.id.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.config.token_lifetime)).timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Verify the signature and expiry of a token and return its claims
    pub fn decode_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;

        let token_data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )?;

        Ok(token_data.claims)
    }

    /// Verify a token and load the user it names.
    ///
    /// A valid token for a user that no longer exists yields `None`.
    pub async fn resolve_user(&self, token: &str) -> Result<Option<UserRecord>, AuthError> {
        let claims = self.decode_token(token)?;
        Ok(self.db.users().get_by_id(&claims.id).await?)
    }
}
