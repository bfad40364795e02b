//! Product Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use catalog_app::domain::{
    pagination::PageRequest,
    products::query::{ProductFilter, ProductListParams},
};

use crate::{
    errors::ApiError,
    extensions::*,
    products::{ProductListItemResponse, errors::into_api_error},
    state::State,
};

/// Raw query string values; parsing happens in the catalog.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProductIndexQuery {
    category: Option<String>,
    category_id: Option<String>,
    min_price: Option<String>,
    max_price: Option<String>,
    is_active: Option<String>,
    search: Option<String>,
    ordering: Option<String>,
    page: Option<String>,
    page_size: Option<String>,
}

impl ProductIndexQuery {
    fn into_params(self) -> (ProductListParams, Option<String>, Option<String>) {
        let params = ProductListParams {
            category: self.category,
            category_id: self.category_id,
            min_price: self.min_price,
            max_price: self.max_price,
            is_active: self.is_active,
            search: self.search,
            ordering: self.ordering,
        };

        (params, self.page, self.page_size)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    /// Total number of matching products
    pub count: u64,

    /// Link to the next page, if any
    pub next: Option<String>,

    /// Link to the previous page, if any
    pub previous: Option<String>,

    pub results: Vec<ProductListItemResponse>,
}

/// Product Index Handler
///
/// Filters: `category` (slug), `category_id`, `min_price`, `max_price`,
/// `is_active`, `search`. Sorting: `ordering` with `price`, `name` or
/// `created_at`, prefixed by `-` for descending. Paging: `page` (or `last`)
/// and `page_size`.
#[endpoint(
    tags("products"),
    summary = "List Products",
    responses(
        (status_code = StatusCode::OK, description = "One page of products"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid filter values"),
        (status_code = StatusCode::NOT_FOUND, description = "Invalid page"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let query = req
        .parse_queries::<ProductIndexQuery>()
        .or_400("could not parse query string")?;

    let (params, page, page_size) = query.into_params();

    let filter = ProductFilter::from_params(params)?;
    let page_request = PageRequest::parse(page.as_deref(), page_size.as_deref())
        .map_err(|_invalid| StatusError::not_found().brief("Invalid page."))?;

    let page = state
        .products()
        .list_products(filter, page_request)
        .await
        .map_err(into_api_error)?;

    let next = page.has_next().then(|| page_link(req, page.page + 1));
    let previous = page.has_previous().then(|| page_link(req, page.page - 1));

    Ok(Json(ProductsResponse {
        count: page.count,
        next,
        previous,
        results: page.results.into_iter().map(Into::into).collect(),
    }))
}

/// The current path and query string with the `page` parameter set to `page`.
///
/// Page 1 is linked without a `page` parameter.
fn page_link(req: &Request, page: u32) -> String {
    let path = req.uri().path();

    let mut pairs: Vec<String> = req
        .uri()
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty() && pair.split('=').next() != Some("page"))
        .map(str::to_owned)
        .collect();

    if page > 1 {
        pairs.push(format!("page={page}"));
    }

    if pairs.is_empty() {
        path.to_owned()
    } else {
        format!("{path}?{}", pairs.join("&"))
    }
}
