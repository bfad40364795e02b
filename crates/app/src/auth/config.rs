//! Authentication settings.

use std::fmt;

use crate::auth::PasswordPolicy;

/// Default access token lifetime: 15 minutes.
pub const DEFAULT_ACCESS_TOKEN_LIFETIME_SECS: u64 = 15 * 60;

/// Default refresh token lifetime: one day.
pub const DEFAULT_REFRESH_TOKEN_LIFETIME_SECS: u64 = 24 * 60 * 60;

/// Default `iss` claim.
pub const DEFAULT_JWT_ISSUER: &str = "catalog";

#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC key used to sign and verify HS256 tokens.
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub access_token_lifetime_secs: u64,
    pub refresh_token_lifetime_secs: u64,
    pub password_policy: PasswordPolicy,
}

impl AuthConfig {
    /// Settings with default lifetimes and policy for the given signing secret.
    #[must_use]
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            jwt_issuer: DEFAULT_JWT_ISSUER.to_owned(),
            access_token_lifetime_secs: DEFAULT_ACCESS_TOKEN_LIFETIME_SECS,
            refresh_token_lifetime_secs: DEFAULT_REFRESH_TOKEN_LIFETIME_SECS,
            password_policy: PasswordPolicy::default(),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"**redacted**")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("access_token_lifetime_secs", &self.access_token_lifetime_secs)
            .field("refresh_token_lifetime_secs", &self.refresh_token_lifetime_secs)
            .field("password_policy", &self.password_policy)
            .finish()
    }
}
