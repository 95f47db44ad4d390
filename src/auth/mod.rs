//! Credential service: password hashing and signed session tokens.
//!
//! Passwords are hashed with Argon2id (salted, never reversible). Session
//! tokens are HS256 JWTs carrying the subject email, role, and expiry; they
//! are opaque to holders and verifiable by anyone with the signing secret.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;
use crate::entities::users::Role;

/// Errors from token issuance and resolution.
///
/// Callers must collapse every resolution failure into one generic 401 so
/// the response never reveals which check failed.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token is invalid or expired")]
    InvalidOrExpired,

    #[error("Token subject does not match a known user")]
    UnknownSubject,

    #[error("Token generation failed: {0}")]
    TokenGeneration(String),
}

/// Claims encoded into a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's email.
    pub sub: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    #[must_use]
    pub fn new(email: &str, role: Role, security: &SecurityConfig) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::minutes(security.token_ttl_minutes)).timestamp();

        Self {
            sub: email.to_string(),
            role,
            exp,
            iat: now.timestamp(),
        }
    }
}

pub fn issue_token(claims: &Claims, security: &SecurityConfig) -> Result<String, AuthError> {
    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());

    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// Verifies signature and expiry and returns the decoded claims.
///
/// Missing `sub` or `role` claims fail deserialization and therefore fail
/// resolution, same as a bad signature or a past expiry.
pub fn decode_token(token: &str, security: &SecurityConfig) -> Result<Claims, AuthError> {
    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let mut validation = Validation::default();
    // No expiry leeway: a token whose exp has passed is already invalid.
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
        tracing::debug!("Token rejected: {e}");
        AuthError::InvalidOrExpired
    })?;

    Ok(token_data.claims)
}

/// Hash a password using Argon2id with the configured cost parameters.
/// A fresh salt per call means repeated hashes of the same input differ
/// while remaining verifiable.
pub fn hash_password(password: &str, security: &SecurityConfig) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        security.argon2_memory_cost_kib,
        security.argon2_time_cost,
        security.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> anyhow::Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

    let argon2 = Argon2::default();
    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
