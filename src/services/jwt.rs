//! Access-token signing/validation and refresh-token generation.
//!
//! Access tokens are HS256 JWTs carrying [`Claims`]. Refresh tokens are opaque
//! random strings with no embedded structure; their authority comes only from
//! a matching session record.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Duration;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use rand::{rngs::OsRng, TryRngCore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::services::clock::Clock;

pub const ACCESS_TOKEN_TYPE: &str = "access_token";
pub const TOKEN_ISSUER: &str = "lms-api";
pub const TOKEN_AUDIENCE: [&str; 2] = ["lms-web", "lms-mobile"];

const REFRESH_TOKEN_BYTES: usize = 64;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // user id
    pub email: String,
    pub typ: String,
    pub iss: String,
    pub aud: Vec<String>,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub jti: String,        // unique token id
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("invalid token")]
    InvalidToken,

    #[error("token expired")]
    Expired,

    #[error("malformed token claims")]
    MalformedClaims,

    #[error("random source failure: {0}")]
    RandomSource(String),
}

pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    pub fn new(secret: &str, access_token_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_ttl,
            clock,
        }
    }

    pub fn issue_access_token(&self, user_id: &str, email: &str) -> Result<String, TokenError> {
        let now = self.clock.now();
        let exp = now + self.access_token_ttl;

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            typ: ACCESS_TOKEN_TYPE.to_string(),
            iss: TOKEN_ISSUER.to_string(),
            aud: TOKEN_AUDIENCE.iter().map(|a| a.to_string()).collect(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Verifies signature, algorithm, issuer and audience, then checks the
    /// time window against the injected clock with no leeway.
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_audience(&TOKEN_AUDIENCE);
        validation.set_required_spec_claims(&["exp", "nbf", "iat", "sub", "iss", "aud"]);
        validation.validate_exp = false;
        validation.validate_nbf = false;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => {
                    TokenError::MalformedClaims
                }
                _ => TokenError::InvalidToken,
            })?
            .claims;

        if claims.typ != ACCESS_TOKEN_TYPE || Uuid::parse_str(&claims.sub).is_err() {
            return Err(TokenError::MalformedClaims);
        }

        let now = self.clock.now().timestamp();
        if now < claims.nbf {
            return Err(TokenError::InvalidToken);
        }
        if now >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    pub fn issue_refresh_token(&self) -> Result<String, TokenError> {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| TokenError::RandomSource(e.to_string()))?;
        Ok(URL_SAFE_NO_PAD.encode(bytes))
    }
}
