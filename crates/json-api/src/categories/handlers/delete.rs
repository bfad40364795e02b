//! Delete Category Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use tracing::info;

use crate::{
    categories::errors::into_api_error,
    errors::ApiError,
    extensions::*,
    observability::{CatalogWrite, record_catalog_write},
    state::State,
};

/// Delete Category Handler
///
/// Removes the category together with every product in it.
#[endpoint(
    tags("categories"),
    summary = "Delete Category",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Category deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Category not found"),
    ),
)]
#[tracing::instrument(
    name = "categories.delete",
    skip(category, depot),
    fields(slug = tracing::field::Empty)
)]
pub(crate) async fn handler(
    category: PathParam<String>,
    depot: &mut Depot,
) -> Result<StatusCode, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.user_id_or_401()?;

    let slug = category.into_inner();

    tracing::Span::current().record("slug", slug.as_str());

    let products_removed = state
        .categories()
        .delete_category(&slug)
        .await
        .map_err(into_api_error)?;

    record_catalog_write("category", CatalogWrite::Delete);

    info!(slug = %slug, products_removed, "deleted category");

    Ok(StatusCode::NO_CONTENT)
}
