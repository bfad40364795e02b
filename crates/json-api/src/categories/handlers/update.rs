//! Update Category Handlers
//!
//! `PUT` replaces the category and needs every required field; `PATCH`
//! changes only the supplied fields.

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use catalog_app::{domain::categories::data::CategoryUpdate, validation::REQUIRED_MESSAGE};

use crate::{
    categories::{CategoryResponse, errors::into_api_error},
    errors::ApiError,
    extensions::*,
    observability::{CatalogWrite, record_catalog_write},
    state::State,
};

/// Update Category Request
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

impl UpdateCategoryRequest {
    fn into_update(self, full: bool) -> Result<CategoryUpdate, ApiError> {
        if full && self.name.is_none() {
            return Err(ApiError::field("name", REQUIRED_MESSAGE));
        }

        Ok(CategoryUpdate {
            name: self.name,
            slug: self.slug,
            description: self.description,
        })
    }
}

/// Replace Category Handler
#[endpoint(
    tags("categories"),
    summary = "Replace Category",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Category updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid fields"),
        (status_code = StatusCode::NOT_FOUND, description = "Category not found"),
    ),
)]
pub(crate) async fn put(
    category: PathParam<String>,
    json: JsonBody<UpdateCategoryRequest>,
    depot: &mut Depot,
) -> Result<Json<CategoryResponse>, ApiError> {
    apply(&category.into_inner(), json.into_inner(), true, depot).await
}

/// Partially Update Category Handler
#[endpoint(
    tags("categories"),
    summary = "Update Category",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Category updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid fields"),
        (status_code = StatusCode::NOT_FOUND, description = "Category not found"),
    ),
)]
pub(crate) async fn patch(
    category: PathParam<String>,
    json: JsonBody<UpdateCategoryRequest>,
    depot: &mut Depot,
) -> Result<Json<CategoryResponse>, ApiError> {
    apply(&category.into_inner(), json.into_inner(), false, depot).await
}

#[tracing::instrument(
    name = "categories.update",
    skip(request, depot),
    fields(new_slug = tracing::field::Empty)
)]
async fn apply(
    slug: &str,
    request: UpdateCategoryRequest,
    full: bool,
    depot: &Depot,
) -> Result<Json<CategoryResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.user_id_or_401()?;

    let category = state
        .categories()
        .update_category(slug, request.into_update(full)?)
        .await
        .map_err(into_api_error)?;

    tracing::Span::current().record("new_slug", category.slug.as_str());

    record_catalog_write("category", CatalogWrite::Update);

    info!(slug, new_slug = %category.slug, "updated category");

    Ok(Json(category.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use catalog_app::domain::categories::{CategoriesServiceError, MockCategoriesService};

    use crate::test_helpers::{categories_service, make_category};

    use super::*;

    fn make_service(categories: MockCategoriesService) -> Service {
        categories_service(
            categories,
            Router::with_path("categories/{category}")
                .put(put)
                .patch(patch),
        )
    }

    #[tokio::test]
    async fn test_put_without_name_returns_field_error() -> TestResult {
        let mut categories = MockCategoriesService::new();

        categories.expect_update_category().never();

        let mut res = TestClient::put("http://example.com/categories/books")
            .json(&json!({ "description": "only this" }))
            .send(&make_service(categories))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body, json!({ "name": ["This field is required."] }));

        Ok(())
    }

    #[tokio::test]
    async fn test_patch_forwards_only_supplied_fields() -> TestResult {
        let mut categories = MockCategoriesService::new();

        categories
            .expect_update_category()
            .once()
            .withf(|slug, update| {
                slug == "books"
                    && *update
                        == CategoryUpdate {
                            description: Some("Paper".to_string()),
                            ..CategoryUpdate::default()
                        }
            })
            .return_once(|_, _| {
                let mut category = make_category(3, "Books", "books");

                category.description = "Paper".to_string();

                Ok(category)
            });

        let mut res = TestClient::patch("http://example.com/categories/books")
            .json(&json!({ "description": "Paper" }))
            .send(&make_service(categories))
            .await;

        let body: CategoryResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.description, "Paper");

        Ok(())
    }

    #[tokio::test]
    async fn test_put_rename_returns_new_slug() -> TestResult {
        let mut categories = MockCategoriesService::new();

        categories
            .expect_update_category()
            .once()
            .withf(|slug, update| slug == "books" && update.name.as_deref() == Some("Novels"))
            .return_once(|_, _| Ok(make_category(3, "Novels", "novels")));

        let mut res = TestClient::put("http://example.com/categories/books")
            .json(&json!({ "name": "Novels" }))
            .send(&make_service(categories))
            .await;

        let body: CategoryResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.slug, "novels");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_unknown_category_returns_404() -> TestResult {
        let mut categories = MockCategoriesService::new();

        categories
            .expect_update_category()
            .once()
            .return_once(|_, _| Err(CategoriesServiceError::NotFound));

        let res = TestClient::patch("http://example.com/categories/missing")
            .json(&json!({ "name": "Anything" }))
            .send(&make_service(categories))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
