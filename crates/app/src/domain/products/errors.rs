//! Products service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::{
    domain::{pagination::InvalidPage, slugs::SlugError},
    validation::ValidationErrors,
};

#[derive(Debug, Error)]
pub enum ProductsServiceError {
    #[error("product already exists")]
    AlreadyExists,

    #[error("product not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("invalid product: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid page")]
    InvalidPage,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for ProductsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl From<SlugError> for ProductsServiceError {
    fn from(error: SlugError) -> Self {
        match error {
            SlugError::Sql(error) => error.into(),
            SlugError::Empty | SlugError::Exhausted => Self::Validation(
                ValidationErrors::single("name", error.field_message()),
            ),
            SlugError::Invalid(_) | SlugError::Taken(_) => {
                Self::Validation(ValidationErrors::single("slug", error.field_message()))
            }
        }
    }
}

impl From<InvalidPage> for ProductsServiceError {
    fn from(_: InvalidPage) -> Self {
        Self::InvalidPage
    }
}
