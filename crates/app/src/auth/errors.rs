//! Auth service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::{
    auth::{PasswordError, TokenError},
    validation::ValidationErrors,
};

#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// Unknown user, wrong password or inactive account.
    #[error("no active account found with the given credentials")]
    InvalidCredentials,

    #[error("token is invalid or expired")]
    InvalidToken,

    #[error("user not found")]
    NotFound,

    #[error("user already exists")]
    AlreadyExists,

    #[error("invalid user: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("token signing error")]
    Token(#[source] TokenError),

    #[error("password hashing error")]
    Password(#[from] PasswordError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for AuthServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            _ => Self::Sql(error),
        }
    }
}

impl From<TokenError> for AuthServiceError {
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::Expired | TokenError::Invalid | TokenError::WrongType { .. } => {
                Self::InvalidToken
            }
            TokenError::Signing(_) => Self::Token(error),
        }
    }
}
