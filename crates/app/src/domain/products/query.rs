//! Product listing filters and ordering.

use std::str::FromStr;

use rust_decimal::Decimal;
use smallvec::SmallVec;

use crate::{domain::categories::records::CategoryId, validation::ValidationErrors};

/// Raw listing parameters as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductListParams {
    pub category: Option<String>,
    pub category_id: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub is_active: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

/// Parsed listing filters. Every populated filter must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category_slug: Option<String>,
    pub category_id: Option<CategoryId>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub is_active: Option<bool>,
    pub search: SmallVec<[String; 4]>,
    pub ordering: ProductOrdering,
}

impl ProductFilter {
    /// Parse raw listing parameters.
    ///
    /// Blank values are treated as absent. Unknown ordering keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns field errors for unparseable `category_id`, prices or `is_active`.
    pub fn from_params(params: ProductListParams) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let category_id = non_blank(params.category_id.as_deref()).and_then(|raw| {
            match raw.parse::<i64>() {
                Ok(id) => Some(CategoryId::from_i64(id)),
                Err(_) => {
                    errors.add("category_id", "Enter a whole number.");
                    None
                }
            }
        });

        let min_price = parse_price(&mut errors, "min_price", params.min_price.as_deref());
        let max_price = parse_price(&mut errors, "max_price", params.max_price.as_deref());

        let is_active = non_blank(params.is_active.as_deref()).and_then(|raw| {
            let parsed = parse_bool(raw);

            if parsed.is_none() {
                errors.add("is_active", "Select a valid choice.");
            }

            parsed
        });

        errors.into_result()?;

        Ok(Self {
            category_slug: non_blank(params.category.as_deref()).map(str::to_owned),
            category_id,
            min_price,
            max_price,
            is_active,
            search: params
                .search
                .as_deref()
                .map(parse_search_terms)
                .unwrap_or_default(),
            ordering: params
                .ordering
                .as_deref()
                .map(ProductOrdering::parse)
                .unwrap_or_default(),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_price(
    errors: &mut ValidationErrors,
    field: &'static str,
    raw: Option<&str>,
) -> Option<Decimal> {
    let raw = non_blank(raw)?;

    match Decimal::from_str(raw) {
        Ok(price) => Some(price),
        Err(_) => {
            errors.add(field, "Enter a number.");
            None
        }
    }
}

/// Accepts `true`/`false`/`1`/`0` in any case.
#[must_use]
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Split a search string on whitespace and commas.
#[must_use]
pub fn parse_search_terms(raw: &str) -> SmallVec<[String; 4]> {
    raw.split(|ch: char| ch.is_whitespace() || ch == ',')
        .filter(|term| !term.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Columns products can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSortKey {
    Price,
    Name,
    CreatedAt,
}

impl ProductSortKey {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "price" => Some(Self::Price),
            "name" => Some(Self::Name),
            "created_at" => Some(Self::CreatedAt),
            _ => None,
        }
    }

    pub(crate) const fn column(self) -> &'static str {
        match self {
            Self::Price => "p.price",
            Self::Name => "p.name",
            Self::CreatedAt => "p.created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductSort {
    pub key: ProductSortKey,
    pub descending: bool,
}

/// Ordering applied to a product listing. Ties always fall back to `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductOrdering(SmallVec<[ProductSort; 3]>);

impl Default for ProductOrdering {
    fn default() -> Self {
        Self(SmallVec::from_elem(
            ProductSort {
                key: ProductSortKey::CreatedAt,
                descending: true,
            },
            1,
        ))
    }
}

impl ProductOrdering {
    /// Parse a comma separated list such as `-price,name`.
    ///
    /// Unknown keys are skipped; if none are recognised the default
    /// (newest first) applies. Repeated keys keep their first position.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut sorts: SmallVec<[ProductSort; 3]> = SmallVec::new();

        for term in raw.split(',').map(str::trim) {
            let (descending, name) = match term.strip_prefix('-') {
                Some(name) => (true, name),
                None => (false, term),
            };

            let Some(key) = ProductSortKey::parse(name) else {
                continue;
            };

            if sorts.iter().all(|sort| sort.key != key) {
                sorts.push(ProductSort { key, descending });
            }
        }

        if sorts.is_empty() {
            Self::default()
        } else {
            Self(sorts)
        }
    }

    #[must_use]
    pub fn sorts(&self) -> &[ProductSort] {
        &self.0
    }

    /// `ORDER BY` body built only from fixed column names.
    pub(crate) fn to_sql(&self) -> String {
        let mut sql = String::new();

        for sort in &self.0 {
            sql.push_str(sort.key.column());
            sql.push_str(if sort.descending { " DESC, " } else { " ASC, " });
        }

        sql.push_str("p.id ASC");
        sql
    }
}
