//! Category Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    categories::{CategorySummaryResponse, errors::into_api_error},
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Categories are never paged, so `next` and `previous` are always null.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CategoriesResponse {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<CategorySummaryResponse>,
}

/// Category Index Handler
///
/// Returns every category, ordered by name.
#[endpoint(tags("categories"), summary = "List Categories")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CategoriesResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let categories = state
        .categories()
        .list_categories()
        .await
        .map_err(into_api_error)?;

    Ok(Json(CategoriesResponse {
        count: categories.len(),
        next: None,
        previous: None,
        results: categories.into_iter().map(Into::into).collect(),
    }))
}
