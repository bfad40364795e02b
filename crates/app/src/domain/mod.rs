//! Catalog Domain Concerns

pub mod categories;
pub mod pagination;
pub mod products;
pub mod slugs;
pub mod users;
