//! Signed bearer tokens (HS256 JWTs).

use std::fmt;

use jiff::Timestamp;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{auth::AuthConfig, domain::users::records::UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claims carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub token_type: TokenType,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token is invalid")]
    Invalid,

    #[error("expected a {expected:?} token")]
    WrongType { expected: TokenType },

    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Issues and verifies access and refresh tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    access_lifetime_secs: i64,
    refresh_lifetime_secs: i64,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("issuer", &self.issuer)
            .field("access_lifetime_secs", &self.access_lifetime_secs)
            .field("refresh_lifetime_secs", &self.refresh_lifetime_secs)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.jwt_issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss"]);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            issuer: config.jwt_issuer.clone(),
            access_lifetime_secs: i64::try_from(config.access_token_lifetime_secs)
                .unwrap_or(i64::MAX),
            refresh_lifetime_secs: i64::try_from(config.refresh_token_lifetime_secs)
                .unwrap_or(i64::MAX),
        }
    }

    /// Sign a new token of `token_type` for `user`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] if encoding fails.
    pub fn issue(&self, user: UserId, token_type: TokenType) -> Result<String, TokenError> {
        self.issue_at(user, token_type, Timestamp::now().as_second())
    }

    pub(crate) fn issue_at(
        &self,
        user: UserId,
        token_type: TokenType,
        issued_at: i64,
    ) -> Result<String, TokenError> {
        let lifetime = match token_type {
            TokenType::Access => self.access_lifetime_secs,
            TokenType::Refresh => self.refresh_lifetime_secs,
        };

        let claims = Claims {
            sub: user.to_string(),
            token_type,
            iss: self.issuer.clone(),
            iat: issued_at,
            exp: issued_at.saturating_add(lifetime),
            jti: Uuid::new_v4().to_string(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Signing)
    }

    /// Check signature, issuer, expiry and type, returning the subject.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Expired`] for stale tokens, [`TokenError::WrongType`]
    /// when the token is of the other kind and [`TokenError::Invalid`] otherwise.
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<UserId, TokenError> {
        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })?;

        if claims.token_type != expected {
            return Err(TokenError::WrongType { expected });
        }

        claims
            .sub
            .parse::<i64>()
            .map(UserId::from_i64)
            .map_err(|_| TokenError::Invalid)
    }
}
