//! Product Handlers

use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use catalog_app::{
    domain::{
        categories::records::CategoryId,
        products::{
            data::{NewProduct, ProductUpdate},
            records::{ProductListing, ProductRecord},
        },
    },
    validation::{REQUIRED_MESSAGE, ValidationErrors},
};

use crate::categories::CategorySummaryResponse;

pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod update;

/// Product Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    pub id: i64,

    /// The id of the category the product belongs to
    pub category: i64,

    pub category_detail: CategorySummaryResponse,
    pub name: String,
    pub slug: String,
    pub description: String,

    /// Decimal price with two places, as a string
    #[salvo(schema(value_type = String))]
    pub price: Decimal,

    pub stock: i32,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ProductRecord> for ProductResponse {
    fn from(product: ProductRecord) -> Self {
        ProductResponse {
            id: product.id.into_i64(),
            category: product.category.id.into_i64(),
            category_detail: product.category.into(),
            name: product.name,
            slug: product.slug,
            description: product.description,
            price: product.price,
            stock: product.stock,
            is_active: product.is_active,
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        }
    }
}

/// Product List Item
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductListItemResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,

    #[salvo(schema(value_type = String))]
    pub price: Decimal,

    pub stock: i32,
    pub is_active: bool,
    pub category_name: String,
    pub created_at: String,
}

impl From<ProductListing> for ProductListItemResponse {
    fn from(product: ProductListing) -> Self {
        ProductListItemResponse {
            id: product.id.into_i64(),
            name: product.name,
            slug: product.slug,
            price: product.price,
            stock: product.stock,
            is_active: product.is_active,
            category_name: product.category_name,
            created_at: product.created_at.to_string(),
        }
    }
}

/// Product Request
///
/// Shared by create, replace and partial update.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct ProductRequest {
    /// Category id
    pub category: Option<i64>,

    pub name: Option<String>,

    /// Derived from `name` when omitted or blank
    pub slug: Option<String>,

    pub description: Option<String>,

    #[salvo(schema(value_type = Option<String>))]
    pub price: Option<Decimal>,

    pub stock: Option<i64>,
    pub is_active: Option<bool>,
}

impl ProductRequest {
    /// Fields every full write must carry.
    fn check_required(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.category.is_none() {
            errors.add("category", REQUIRED_MESSAGE);
        }

        if self.name.is_none() {
            errors.add("name", REQUIRED_MESSAGE);
        }

        if self.price.is_none() {
            errors.add("price", REQUIRED_MESSAGE);
        }

        errors.into_result()
    }

    pub(crate) fn into_new_product(self) -> Result<NewProduct, ValidationErrors> {
        self.check_required()?;

        Ok(NewProduct {
            category: CategoryId::from_i64(self.category.unwrap_or_default()),
            name: self.name.unwrap_or_default(),
            slug: self.slug,
            description: self.description.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            stock: self.stock.unwrap_or_default(),
            is_active: self.is_active.unwrap_or(true),
        })
    }

    pub(crate) fn into_update(self, full: bool) -> Result<ProductUpdate, ValidationErrors> {
        if full {
            self.check_required()?;
        }

        Ok(ProductUpdate {
            category: self.category.map(CategoryId::from_i64),
            name: self.name,
            slug: self.slug,
            description: self.description,
            price: self.price,
            stock: self.stock,
            is_active: self.is_active,
        })
    }
}
