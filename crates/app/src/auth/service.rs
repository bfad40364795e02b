//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use tokio::task;
use tracing::info;

use crate::{
    auth::{
        AuthConfig, AuthServiceError, PasswordError, PasswordPolicy, TokenIssuer, TokenType,
        dummy_password_hash, hash_password, verify_password,
    },
    database::Db,
    domain::users::{
        data::{NewUser, Password},
        records::{UserId, UserRecord},
        repository::{PgUsersRepository, UserRow},
    },
    validation::ValidationErrors,
};

/// Freshly issued access and refresh tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone)]
pub struct PgAuthService {
    db: Db,
    users: PgUsersRepository,
    tokens: TokenIssuer,
    policy: PasswordPolicy,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db, config: &AuthConfig) -> Self {
        Self {
            db,
            users: PgUsersRepository::new(),
            tokens: TokenIssuer::new(config),
            policy: config.password_policy,
        }
    }
}

/// Run password hashing work on the blocking pool.
async fn blocking<T, F>(f: F) -> Result<T, AuthServiceError>
where
    F: FnOnce() -> Result<T, PasswordError> + Send + 'static,
    T: Send + 'static,
{
    task::spawn_blocking(f)
        .await
        .map_err(|e| PasswordError::Hash(e.to_string()))?
        .map_err(AuthServiceError::from)
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn register_user(&self, user: NewUser) -> Result<UserRecord, AuthServiceError> {
        let user = user.validated(&self.policy)?;

        let mut tx = self.db.begin().await?;

        let mut errors = ValidationErrors::new();

        if self.users.username_taken(&mut tx, &user.username).await? {
            errors.add("username", "A user with that username already exists.");
        }

        if self.users.email_taken(&mut tx, &user.email).await? {
            errors.add("email", "A user with that email already exists.");
        }

        errors.into_result()?;

        let password = user.password.clone();
        let password_hash = blocking(move || hash_password(password.expose())).await?;

        let created = self
            .users
            .create_user(
                &mut tx,
                UserRow {
                    username: &user.username,
                    email: &user.email,
                    password_hash: &password_hash,
                    first_name: &user.first_name,
                    last_name: &user.last_name,
                },
            )
            .await?;

        tx.commit().await?;

        info!(user = %created.id, username = %created.username, "registered user");

        Ok(created)
    }

    async fn obtain_token_pair(
        &self,
        username: &str,
        password: Password,
    ) -> Result<TokenPair, AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let credentials = self.users.find_credentials(&mut tx, username).await?;

        tx.commit().await?;

        // Unknown usernames still pay for one Argon2 verification.
        let hash = match &credentials {
            Some(credentials) => credentials.password_hash.clone(),
            None => blocking(|| dummy_password_hash().map(str::to_owned)).await?,
        };

        let matches = blocking(move || verify_password(password.expose(), &hash)).await?;

        let Some(credentials) = credentials.filter(|credentials| matches && credentials.is_active)
        else {
            return Err(AuthServiceError::InvalidCredentials);
        };

        Ok(TokenPair {
            access: self.tokens.issue(credentials.id, TokenType::Access)?,
            refresh: self.tokens.issue(credentials.id, TokenType::Refresh)?,
        })
    }

    async fn refresh_access_token(&self, refresh_token: &str) -> Result<String, AuthServiceError> {
        let user = self.tokens.verify(refresh_token, TokenType::Refresh)?;

        Ok(self.tokens.issue(user, TokenType::Access)?)
    }

    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserId, AuthServiceError> {
        let user = self.tokens.verify(bearer_token, TokenType::Access)?;

        let mut tx = self.db.begin().await?;

        let record = match self.users.get_user(&mut tx, user).await {
            Ok(record) => record,
            Err(sqlx::Error::RowNotFound) => return Err(AuthServiceError::InvalidToken),
            Err(error) => return Err(error.into()),
        };

        tx.commit().await?;

        if !record.is_active {
            return Err(AuthServiceError::InvalidToken);
        }

        Ok(record.id)
    }

    async fn current_user(&self, user: UserId) -> Result<UserRecord, AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.users.get_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(record)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account after validating fields and the password policy.
    async fn register_user(&self, user: NewUser) -> Result<UserRecord, AuthServiceError>;

    /// Exchange a username and password for an access and refresh token.
    async fn obtain_token_pair(
        &self,
        username: &str,
        password: Password,
    ) -> Result<TokenPair, AuthServiceError>;

    /// Exchange a refresh token for a new access token.
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<String, AuthServiceError>;

    /// Resolve an access token to the active user it was issued for.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserId, AuthServiceError>;

    /// Fetch a user's profile.
    async fn current_user(&self, user: UserId) -> Result<UserRecord, AuthServiceError>;
}
