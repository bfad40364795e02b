//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};

use catalog_app::{
    auth::MockAuthService,
    context::AppContext,
    domain::{
        categories::{
            MockCategoriesService,
            records::{CategoryId, CategoryRecord, CategorySummary},
        },
        products::{
            MockProductsService,
            records::{ProductId, ProductListing, ProductRecord},
        },
        users::records::UserId,
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_ID: UserId = UserId::from_i64(1);

#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_user_id(TEST_USER_ID);
    ctrl.call_next(req, depot, res).await;
}

pub(crate) fn strict_categories_mock() -> MockCategoriesService {
    let mut categories = MockCategoriesService::new();

    categories.expect_list_categories().never();
    categories.expect_get_category().never();
    categories.expect_create_category().never();
    categories.expect_update_category().never();
    categories.expect_delete_category().never();

    categories
}

pub(crate) fn strict_products_mock() -> MockProductsService {
    let mut products = MockProductsService::new();

    products.expect_list_products().never();
    products.expect_get_product().never();
    products.expect_create_product().never();
    products.expect_update_product().never();
    products.expect_delete_product().never();

    products
}

pub(crate) fn strict_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_register_user().never();
    auth.expect_obtain_token_pair().never();
    auth.expect_refresh_access_token().never();
    auth.expect_authenticate_bearer().never();
    auth.expect_current_user().never();

    auth
}

pub(crate) fn state_with(
    categories: MockCategoriesService,
    products: MockProductsService,
    auth: MockAuthService,
) -> Arc<State> {
    State::shared(AppContext {
        categories: Arc::new(categories),
        products: Arc::new(products),
        auth: Arc::new(auth),
    })
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    state_with(strict_categories_mock(), strict_products_mock(), auth)
}

/// A service for `route` whose requests are made by [`TEST_USER_ID`].
pub(crate) fn categories_service(categories: MockCategoriesService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with(
                categories,
                strict_products_mock(),
                strict_auth_mock(),
            )))
            .hoop(inject_user)
            .push(route),
    )
}

/// A service for `route` whose requests are made by [`TEST_USER_ID`].
pub(crate) fn products_service(products: MockProductsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with(
                strict_categories_mock(),
                products,
                strict_auth_mock(),
            )))
            .hoop(inject_user)
            .push(route),
    )
}

/// A service for `route` with no authenticated caller.
pub(crate) fn auth_service(auth: MockAuthService, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(state_with_auth(auth))).push(route))
}

pub(crate) fn make_category(id: i64, name: &str, slug: &str) -> CategoryRecord {
    CategoryRecord {
        id: CategoryId::from_i64(id),
        name: name.to_string(),
        slug: slug.to_string(),
        description: String::new(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_product(id: i64, name: &str, slug: &str, price: Decimal) -> ProductRecord {
    ProductRecord {
        id: ProductId::from_i64(id),
        category: CategorySummary {
            id: CategoryId::from_i64(1),
            name: "Lighting".to_string(),
            slug: "lighting".to_string(),
        },
        name: name.to_string(),
        slug: slug.to_string(),
        description: String::new(),
        price,
        stock: 0,
        is_active: true,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_listing(id: i64, slug: &str, price: Decimal) -> ProductListing {
    ProductListing {
        id: ProductId::from_i64(id),
        name: slug.replace('-', " "),
        slug: slug.to_string(),
        price,
        stock: 0,
        is_active: true,
        category_name: "Lighting".to_string(),
        created_at: Timestamp::UNIX_EPOCH,
    }
}
