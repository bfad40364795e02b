//! App Router

use salvo::Router;

use crate::{auth, categories, products, users};

/// Catalog and auth routes.
///
/// Any bearer token presented is checked; catalog writes need one.
pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::authenticate)
        .push(
            Router::new()
                .hoop(auth::middleware::writes_require_user)
                .push(
                    Router::with_path("categories")
                        .get(categories::index::handler)
                        .post(categories::create::handler)
                        .push(
                            Router::with_path("{category}")
                                .get(categories::get::handler)
                                .put(categories::update::put)
                                .patch(categories::update::patch)
                                .delete(categories::delete::handler),
                        ),
                )
                .push(
                    Router::with_path("products")
                        .get(products::index::handler)
                        .post(products::create::handler)
                        .push(
                            Router::with_path("{product}")
                                .get(products::get::handler)
                                .put(products::update::put)
                                .patch(products::update::patch)
                                .delete(products::delete::handler),
                        ),
                ),
        )
        .push(
            Router::with_path("auth")
                .push(Router::with_path("register").post(users::register::handler))
                .push(
                    Router::with_path("token")
                        .post(users::token::handler)
                        .push(Router::with_path("refresh").post(users::refresh::handler)),
                )
                .push(Router::with_path("profile").get(users::profile::handler)),
        )
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use salvo::{
        affix_state::inject,
        http::header::AUTHORIZATION,
        prelude::*,
        test::{ResponseExt, TestClient},
    };
    use serde_json::json;
    use testresult::TestResult;

    use catalog_app::{
        auth::{AuthServiceError, MockAuthService},
        domain::{
            categories::MockCategoriesService,
            pagination::{Page, PageWindow},
            products::MockProductsService,
            users::records::UserId,
        },
    };

    use crate::test_helpers::{
        make_product, strict_auth_mock, strict_categories_mock, strict_products_mock, state_with,
    };

    use super::*;

    fn make_service(
        categories: MockCategoriesService,
        products: MockProductsService,
        auth: MockAuthService,
    ) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(state_with(categories, products, auth)))
                .push(app_router()),
        )
    }

    fn lamp() -> serde_json::Value {
        json!({ "category": 1, "name": "Desk Lamp", "price": "19.99" })
    }

    #[tokio::test]
    async fn test_anonymous_create_product_is_rejected() -> TestResult {
        let mut products = MockProductsService::new();

        products.expect_create_product().never();

        let res = TestClient::post("http://example.com/products")
            .json(&lamp())
            .send(&make_service(strict_categories_mock(), products, strict_auth_mock()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_authenticated_create_product_succeeds() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer()
            .once()
            .withf(|token| token == "access")
            .return_once(|_| Ok(UserId::from_i64(1)));

        let mut products = MockProductsService::new();

        products
            .expect_create_product()
            .once()
            .return_once(|_| Ok(make_product(9, "Desk Lamp", "desk-lamp", Decimal::new(1999, 2))));

        let res = TestClient::post("http://example.com/products")
            .add_header(AUTHORIZATION, "Bearer access", true)
            .json(&lamp())
            .send(&make_service(strict_categories_mock(), products, auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        Ok(())
    }

    #[tokio::test]
    async fn test_reads_are_public() -> TestResult {
        let mut products = MockProductsService::new();

        products.expect_list_products().once().return_once(|_, _| {
            Ok(Page::new(
                vec![],
                0,
                PageWindow {
                    page: 1,
                    page_size: 20,
                    num_pages: 1,
                },
            ))
        });

        let mut categories = MockCategoriesService::new();

        categories
            .expect_list_categories()
            .once()
            .return_once(|| Ok(vec![]));

        let service = make_service(categories, products, strict_auth_mock());

        let products_res = TestClient::get("http://example.com/products").send(&service).await;
        let categories_res = TestClient::get("http://example.com/categories").send(&service).await;

        assert_eq!(products_res.status_code, Some(StatusCode::OK));
        assert_eq!(categories_res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_token_on_public_read_returns_401() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer()
            .once()
            .return_once(|_| Err(AuthServiceError::InvalidToken));

        let mut res = TestClient::get("http://example.com/categories")
            .add_header(AUTHORIZATION, "Bearer expired", true)
            .send(&make_service(strict_categories_mock(), strict_products_mock(), auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
        assert!(!res.take_string().await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_anonymous_delete_category_is_rejected() -> TestResult {
        let mut categories = MockCategoriesService::new();

        categories.expect_delete_category().never();

        let res = TestClient::delete("http://example.com/categories/books")
            .send(&make_service(categories, strict_products_mock(), strict_auth_mock()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
