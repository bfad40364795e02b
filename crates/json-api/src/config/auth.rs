//! Auth Config

use catalog_app::auth::{
    AuthConfig, DEFAULT_ACCESS_TOKEN_LIFETIME_SECS, DEFAULT_JWT_ISSUER,
    DEFAULT_MIN_PASSWORD_LENGTH, DEFAULT_REFRESH_TOKEN_LIFETIME_SECS, PasswordPolicy,
};
use clap::Args;

/// Token signing and password policy settings.
#[derive(Debug, Args)]
pub struct AuthSettings {
    /// HMAC secret used to sign access and refresh tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// `iss` claim written to and required on tokens
    #[arg(long, env = "JWT_ISSUER", default_value = DEFAULT_JWT_ISSUER)]
    pub jwt_issuer: String,

    /// Access token lifetime in seconds
    #[arg(long, env = "ACCESS_TOKEN_LIFETIME_SECONDS", default_value_t = DEFAULT_ACCESS_TOKEN_LIFETIME_SECS)]
    pub access_token_lifetime_seconds: u64,

    /// Refresh token lifetime in seconds
    #[arg(long, env = "REFRESH_TOKEN_LIFETIME_SECONDS", default_value_t = DEFAULT_REFRESH_TOKEN_LIFETIME_SECS)]
    pub refresh_token_lifetime_seconds: u64,

    /// Minimum length for new passwords
    #[arg(long, env = "PASSWORD_MIN_LENGTH", default_value_t = DEFAULT_MIN_PASSWORD_LENGTH)]
    pub password_min_length: usize,
}

impl AuthSettings {
    #[must_use]
    pub fn to_auth_config(&self) -> AuthConfig {
        AuthConfig {
            jwt_secret: self.jwt_secret.clone(),
            jwt_issuer: self.jwt_issuer.clone(),
            access_token_lifetime_secs: self.access_token_lifetime_seconds,
            refresh_token_lifetime_secs: self.refresh_token_lifetime_seconds,
            password_policy: PasswordPolicy {
                min_length: self.password_min_length,
            },
        }
    }
}
