//! Category Errors

use salvo::http::StatusError;
use tracing::error;

use catalog_app::domain::categories::CategoriesServiceError;

use crate::errors::ApiError;

pub(crate) fn into_api_error(error: CategoriesServiceError) -> ApiError {
    match error {
        CategoriesServiceError::Validation(errors) => errors.into(),
        CategoriesServiceError::AlreadyExists => StatusError::conflict()
            .brief("A category with this slug was created concurrently, retry the request")
            .into(),
        CategoriesServiceError::InvalidReference
        | CategoriesServiceError::MissingRequiredData
        | CategoriesServiceError::InvalidData => StatusError::bad_request()
            .brief("Invalid category payload")
            .into(),
        CategoriesServiceError::NotFound => StatusError::not_found().brief("Not found.").into(),
        CategoriesServiceError::Sql(source) => {
            error!("category storage error: {source}");

            StatusError::internal_server_error().into()
        }
    }
}
