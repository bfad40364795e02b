//! Update Product Handlers
//!
//! `PUT` needs `category`, `name` and `price`; `PATCH` changes only the
//! supplied fields.

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use tracing::info;

use crate::{
    errors::ApiError,
    extensions::*,
    observability::{CatalogWrite, record_catalog_write},
    products::{ProductRequest, ProductResponse, errors::into_api_error},
    state::State,
};

/// Replace Product Handler
#[endpoint(
    tags("products"),
    summary = "Replace Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid fields"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
    ),
)]
pub(crate) async fn put(
    product: PathParam<String>,
    json: JsonBody<ProductRequest>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, ApiError> {
    apply(&product.into_inner(), json.into_inner(), true, depot).await
}

/// Partially Update Product Handler
#[endpoint(
    tags("products"),
    summary = "Update Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid fields"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
    ),
)]
pub(crate) async fn patch(
    product: PathParam<String>,
    json: JsonBody<ProductRequest>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, ApiError> {
    apply(&product.into_inner(), json.into_inner(), false, depot).await
}

#[tracing::instrument(
    name = "products.update",
    skip(request, depot),
    fields(new_slug = tracing::field::Empty)
)]
async fn apply(
    slug: &str,
    request: ProductRequest,
    full: bool,
    depot: &Depot,
) -> Result<Json<ProductResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.user_id_or_401()?;

    let product = state
        .products()
        .update_product(slug, request.into_update(full)?)
        .await
        .map_err(into_api_error)?;

    tracing::Span::current().record("new_slug", product.slug.as_str());

    record_catalog_write("product", CatalogWrite::Update);

    info!(slug, new_slug = %product.slug, "updated product");

    Ok(Json(product.into()))
}
