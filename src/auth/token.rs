//! Session token issuing and validation
//!
//! Tokens are HS256 JWTs over a shared secret with claims
//! {sub: email, iat, exp}. Forging one requires the secret; validity is
//! purely signature + expiry, so validation is a side-effect-free
//! computation safe for unlimited concurrent use.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("token signature mismatch")]
    BadSignature,
    #[error("token expired")]
    Expired,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::BadSignature,
            _ => TokenError::Malformed,
        }
    }
}

/// Issues and validates session tokens against a shared secret.
/// The secret is immutable after startup.
#[derive(Clone)]
pub struct TokenProvider {
    secret: String,
    validity_ms: i64,
}

impl TokenProvider {
    pub fn new(secret: String, validity_ms: i64) -> Self {
        Self {
            secret,
            validity_ms,
        }
    }

    /// Sign a token for the given subject, expiring after the configured
    /// validity window
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::milliseconds(self.validity_ms)).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(TokenError::from)
    }

    /// True only when the signature verifies and the token is unexpired.
    /// Every parse/verify failure collapses to false here; the typed error
    /// stays internal.
    pub fn validate(&self, token: &str) -> bool {
        self.decode_claims(token).is_ok()
    }

    /// Extract the subject (email) embedded in the token. Callers are
    /// expected to have validated the token first; on an invalid token this
    /// surfaces the decoder's own failure.
    pub fn extract_subject(&self, token: &str) -> Result<String, TokenError> {
        self.decode_claims(token).map(|claims| claims.sub)
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // jsonwebtoken defaults to 60s of expiry leeway; the validity window
        // is exact in this system.
        validation.leeway = 0;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )?;
        Ok(data.claims)
    }
}
