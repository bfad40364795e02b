//! Get Category Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use crate::{
    categories::{CategoryResponse, errors::into_api_error},
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Get Category Handler
///
/// Returns a category by slug.
#[endpoint(
    tags("categories"),
    summary = "Get Category",
    responses(
        (status_code = StatusCode::OK, description = "Category found"),
        (status_code = StatusCode::NOT_FOUND, description = "Category not found"),
    ),
)]
pub(crate) async fn handler(
    category: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<CategoryResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let category = state
        .categories()
        .get_category(&category.into_inner())
        .await
        .map_err(into_api_error)?;

    Ok(Json(category.into()))
}
