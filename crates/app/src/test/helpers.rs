//! Test Helpers

use rust_decimal::Decimal;

use crate::{
    auth::{AuthService, AuthServiceError},
    domain::{
        categories::{
            CategoriesService, CategoriesServiceError, data::NewCategory,
            records::{CategoryId, CategoryRecord},
        },
        products::{
            ProductsService, ProductsServiceError, data::NewProduct, records::ProductRecord,
        },
        users::{
            data::{NewUser, Password},
            records::UserRecord,
        },
    },
    test::TestContext,
};

pub(crate) async fn create_category(
    ctx: &TestContext,
    name: &str,
) -> Result<CategoryRecord, CategoriesServiceError> {
    ctx.categories
        .create_category(NewCategory {
            name: name.to_owned(),
            slug: None,
            description: String::new(),
        })
        .await
}

pub(crate) async fn create_product(
    ctx: &TestContext,
    category: CategoryId,
    name: &str,
    price: Decimal,
) -> Result<ProductRecord, ProductsServiceError> {
    ctx.products
        .create_product(NewProduct {
            category,
            name: name.to_owned(),
            slug: None,
            description: String::new(),
            price,
            stock: 0,
            is_active: true,
        })
        .await
}

pub(crate) async fn register_user(
    ctx: &TestContext,
    username: &str,
    password: &str,
) -> Result<UserRecord, AuthServiceError> {
    ctx.auth
        .register_user(NewUser {
            username: username.to_owned(),
            email: format!("{username}@example.com"),
            password: Password::new(password),
            password_confirm: Password::new(password),
            first_name: String::new(),
            last_name: String::new(),
        })
        .await
}
