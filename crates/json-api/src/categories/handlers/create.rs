//! Create Category Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use catalog_app::{domain::categories::data::NewCategory, validation::REQUIRED_MESSAGE};

use crate::{
    categories::{CategoryResponse, errors::into_api_error},
    errors::ApiError,
    extensions::*,
    observability::{CatalogWrite, record_catalog_write},
    state::State,
};

/// Create Category Request
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct CreateCategoryRequest {
    pub name: Option<String>,

    /// Derived from `name` when omitted or blank
    pub slug: Option<String>,

    pub description: Option<String>,
}

impl TryFrom<CreateCategoryRequest> for NewCategory {
    type Error = ApiError;

    fn try_from(request: CreateCategoryRequest) -> Result<Self, Self::Error> {
        let name = request
            .name
            .ok_or_else(|| ApiError::field("name", REQUIRED_MESSAGE))?;

        Ok(NewCategory {
            name,
            slug: request.slug,
            description: request.description.unwrap_or_default(),
        })
    }
}

/// Create Category Handler
#[endpoint(
    tags("categories"),
    summary = "Create Category",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Category created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid fields"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::CONFLICT, description = "Slug taken concurrently"),
    ),
)]
#[tracing::instrument(
    name = "categories.create",
    skip(json, depot, res),
    fields(user_id = tracing::field::Empty, slug = tracing::field::Empty)
)]
pub(crate) async fn handler(
    json: JsonBody<CreateCategoryRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CategoryResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_id_or_401()?;

    let span = tracing::Span::current();

    span.record("user_id", tracing::field::display(user));

    let category = state
        .categories()
        .create_category(json.into_inner().try_into()?)
        .await
        .map_err(into_api_error)?;

    span.record("slug", category.slug.as_str());

    res.add_header(LOCATION, format!("/categories/{}", category.slug), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    record_catalog_write("category", CatalogWrite::Create);

    info!(slug = %category.slug, "created category");

    Ok(Json(category.into()))
}
