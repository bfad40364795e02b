//! Category Records

use jiff::Timestamp;

use crate::ids::TypedId;

/// Category ID
pub type CategoryId = TypedId<CategoryRecord>;

/// Category Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRecord {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The identifying columns of a category, as embedded in product results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

impl From<&CategoryRecord> for CategorySummary {
    fn from(record: &CategoryRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            slug: record.slug.clone(),
        }
    }
}
