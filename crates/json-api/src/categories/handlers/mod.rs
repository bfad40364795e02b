//! Category Handlers

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use catalog_app::domain::categories::records::{CategoryRecord, CategorySummary};

pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod update;

/// Category Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,

    /// The date and time the category was created
    pub created_at: String,

    /// The date and time the category was last updated
    pub updated_at: String,
}

impl From<CategoryRecord> for CategoryResponse {
    fn from(category: CategoryRecord) -> Self {
        CategoryResponse {
            id: category.id.into_i64(),
            name: category.name,
            slug: category.slug,
            description: category.description,
            created_at: category.created_at.to_string(),
            updated_at: category.updated_at.to_string(),
        }
    }
}

/// Lightweight category shape used in listings and embedded in products.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct CategorySummaryResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl From<CategorySummary> for CategorySummaryResponse {
    fn from(category: CategorySummary) -> Self {
        CategorySummaryResponse {
            id: category.id.into_i64(),
            name: category.name,
            slug: category.slug,
        }
    }
}

impl From<CategoryRecord> for CategorySummaryResponse {
    fn from(category: CategoryRecord) -> Self {
        CategorySummary::from(&category).into()
    }
}
