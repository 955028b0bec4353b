//! Password hashing and session tokens.
//!
//! Passwords are stored as Argon2id PHC strings. Sessions are HS256 JWTs
//! carrying the user id in `sub`.

mod extract;

pub use extract::AuthUser;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_TOKEN_TTL_SECS: i64 = 60 * 60;
pub const DEFAULT_HASH_ITERATIONS: u32 = Params::DEFAULT_T_COST;
pub const DEFAULT_HASH_MEMORY_KIB: u32 = Params::DEFAULT_M_COST;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token signing secret is not configured")]
    MissingSecret,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("token encoding failed: {0}")]
    Encode(String),

    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Claims for `user_id`; `iat`/`exp` are filled in at issue time.
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            sub: user_id.into(),
            email: None,
            iat: 0,
            exp: 0,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub secret: String,
    pub token_ttl: Duration,
    pub hash_iterations: u32,
    pub hash_memory_kib: u32,
}

impl AuthConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            token_ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
            hash_iterations: DEFAULT_HASH_ITERATIONS,
            hash_memory_kib: DEFAULT_HASH_MEMORY_KIB,
        }
    }
}

pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    hasher: Argon2<'static>,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Result<Self, AuthError> {
        if config.secret.is_empty() {
            return Err(AuthError::MissingSecret);
        }

        let params = Params::new(config.hash_memory_kib, config.hash_iterations, 1, None)
            .map_err(|e| AuthError::Hash(e.to_string()))?;

        let mut validation = Validation::default();
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            hasher: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            token_ttl: config.token_ttl,
        })
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.hasher
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Hash(e.to_string()))
    }

    /// `false` for a wrong password and for a stored hash that does not parse.
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self
                .hasher
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    pub fn issue_token(&self, claims: Claims, ttl: Duration) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            ..claims
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Encode(e.to_string()))
    }

    /// Issues a token with the configured lifetime.
    pub fn issue_session(&self, claims: Claims) -> Result<String, AuthError> {
        self.issue_token(claims, self.token_ttl)
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}

#[cfg(test)]
pub(crate) fn test_config(secret: &str) -> AuthConfig {
    AuthConfig {
        hash_iterations: 1,
        hash_memory_kib: 64,
        ..AuthConfig::new(secret)
    }
}
