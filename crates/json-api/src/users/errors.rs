//! Auth Errors

use salvo::http::StatusError;
use tracing::error;

use catalog_app::auth::AuthServiceError;

use crate::errors::ApiError;

pub(crate) fn into_api_error(error: AuthServiceError) -> ApiError {
    match error {
        AuthServiceError::Validation(errors) => errors.into(),
        AuthServiceError::InvalidCredentials => StatusError::unauthorized()
            .brief("No active account found with the given credentials")
            .into(),
        AuthServiceError::InvalidToken => StatusError::unauthorized()
            .brief("Token is invalid or expired")
            .into(),
        AuthServiceError::NotFound => StatusError::not_found().brief("Not found.").into(),
        AuthServiceError::AlreadyExists => StatusError::conflict()
            .brief("A user with that username or email was created concurrently")
            .into(),
        AuthServiceError::Token(source) => {
            error!("failed to sign token: {source}");

            StatusError::internal_server_error().into()
        }
        AuthServiceError::Password(source) => {
            error!("failed to hash password: {source}");

            StatusError::internal_server_error().into()
        }
        AuthServiceError::Sql(source) => {
            error!("user storage error: {source}");

            StatusError::internal_server_error().into()
        }
    }
}
