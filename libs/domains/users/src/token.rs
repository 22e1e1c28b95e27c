//! Access-token minting.
//!
//! Tokens are HS256 JWTs, but they are only ever compared as strings: nothing
//! decodes or verifies them after issuance.

use chrono::Utc;
use core_config::{ConfigError, Environment, FromEnv, env_optional};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::AccessToken;

const DEVELOPMENT_SECRET: &str = "users-service-development-secret";

/// Token signing configuration.
///
/// Loaded from `TOKEN_SECRET`. Production refuses to start without it;
/// development falls back to a fixed secret.
#[derive(Clone, Debug)]
pub struct TokenConfig {
    pub secret: String,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl FromEnv for TokenConfig {
    fn from_env() -> Result<Self, ConfigError> {
        match env_optional("TOKEN_SECRET") {
            Some(secret) => Ok(Self { secret }),
            None if Environment::from_env().is_production() => {
                Err(ConfigError::MissingEnvVar("TOKEN_SECRET".to_string()))
            }
            None => {
                tracing::warn!("TOKEN_SECRET not set, using the development secret");
                Ok(Self::new(DEVELOPMENT_SECRET))
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct AccessTokenClaims<'a> {
    username: &'a str,
    iat: i64,
    jti: String,
}

/// Mints access tokens for logged-in users.
#[derive(Clone)]
pub struct TokenIssuer {
    key: EncodingKey,
}

impl TokenIssuer {
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            key: EncodingKey::from_secret(config.secret.as_bytes()),
        }
    }

    /// Issue a fresh token for `username`; every call yields a distinct value.
    pub fn issue(&self, username: &str) -> UserResult<AccessToken> {
        let claims = AccessTokenClaims {
            username,
            iat: Utc::now().timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::default(), &claims, &self.key)
            .map_err(|e| UserError::Token(e.to_string()))?;

        Ok(AccessToken { token })
    }
}
