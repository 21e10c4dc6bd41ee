use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod guard;
pub mod identity;

pub use guard::{authorize, Guard, RouteContext};
pub use identity::{Identity, IdentityExtractor};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
    #[serde(default)]
    pub iat: i64,
    /// Absent on tokens issued without an expiry; checked whenever present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    pub fn new(identity: &Identity, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            username: identity.username.clone(),
            is_admin: identity.is_admin,
            iat: now.timestamp(),
            exp: Some(exp),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AuthError {
    #[error("Must be logged in")]
    NotLoggedIn,

    #[error("Must be admin")]
    NotAdmin,

    #[error("Must be admin or the user {0}")]
    NotSelfOrAdmin(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),
}

impl AuthError {
    /// True for access denials, as opposed to token plumbing failures
    pub fn is_denial(&self) -> bool {
        matches!(
            self,
            AuthError::NotLoggedIn | AuthError::NotAdmin | AuthError::NotSelfOrAdmin(_)
        )
    }
}

/// Signing and verification keys derived from the configured secret
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    expiry_hours: u64,
    has_secret: bool,
}

impl TokenKeys {
    pub fn new(secret: &str, expiry_hours: u64) -> Self {
        let mut validation = Validation::default();
        validation.required_spec_claims.remove("exp");

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expiry_hours,
            has_secret: !secret.is_empty(),
        }
    }

    /// Sign a token carrying `username` and `isAdmin`
    pub fn create_token(&self, identity: &Identity) -> Result<String, AuthError> {
        if !self.has_secret {
            return Err(AuthError::InvalidSecret);
        }

        let claims = Claims::new(identity, self.expiry_hours);
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Verify signature and expiry, returning the decoded claims
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        if !self.has_secret {
            return Err(AuthError::InvalidSecret);
        }

        let token_data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(token_data.claims)
    }
}
