//! Product Errors

use salvo::http::StatusError;
use tracing::error;

use catalog_app::domain::products::ProductsServiceError;

use crate::errors::ApiError;

pub(crate) fn into_api_error(error: ProductsServiceError) -> ApiError {
    match error {
        ProductsServiceError::Validation(errors) => errors.into(),
        ProductsServiceError::InvalidReference => {
            ApiError::field("category", "The selected category no longer exists.")
        }
        ProductsServiceError::AlreadyExists => StatusError::conflict()
            .brief("A product with this slug was created concurrently, retry the request")
            .into(),
        ProductsServiceError::MissingRequiredData | ProductsServiceError::InvalidData => {
            StatusError::bad_request()
                .brief("Invalid product payload")
                .into()
        }
        ProductsServiceError::InvalidPage => StatusError::not_found().brief("Invalid page.").into(),
        ProductsServiceError::NotFound => StatusError::not_found().brief("Not found.").into(),
        ProductsServiceError::Sql(source) => {
            error!("product storage error: {source}");

            StatusError::internal_server_error().into()
        }
    }
}
