//! Product Records

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{domain::categories::records::CategorySummary, ids::TypedId};

/// Product ID
pub type ProductId = TypedId<ProductRecord>;

/// Product Record, joined with the category it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub id: ProductId,
    pub category: CategorySummary,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The columns shown for a product in listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductListing {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    pub stock: i32,
    pub is_active: bool,
    pub category_name: String,
    pub created_at: Timestamp,
}
