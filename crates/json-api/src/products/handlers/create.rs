//! Create Product Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::extract::JsonBody,
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

/// Create Product Handler
#[endpoint(
    tags("products"),
    summary = "Create Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid fields"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::CONFLICT, description = "Slug taken concurrently"),
    ),
)]
#[tracing::instrument(
    name = "products.create",
    skip(json, depot, res),
    fields(
        user_id = tracing::field::Empty,
        category = tracing::field::Empty,
        slug = tracing::field::Empty
    )
)]
pub(crate) async fn handler(
    json: JsonBody<ProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_id_or_401()?;
    let product = json.into_inner().into_new_product()?;

    let span = tracing::Span::current();

    span.record("user_id", tracing::field::display(user));
    span.record("category", tracing::field::display(product.category));

    let product = state
        .products()
        .create_product(product)
        .await
        .map_err(into_api_error)?;

    span.record("slug", product.slug.as_str());

    res.add_header(LOCATION, format!("/products/{}", product.slug), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    record_catalog_write("product", CatalogWrite::Create);

    info!(slug = %product.slug, price = %product.price, "created product");

    Ok(Json(product.into()))
}
