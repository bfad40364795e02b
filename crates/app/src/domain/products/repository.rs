//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{
    FromRow, Postgres, QueryBuilder, Row, Transaction, postgres::PgRow, query, query_as,
    query_scalar,
};

use crate::domain::{
    categories::records::{CategoryId, CategorySummary},
    products::{
        data::{ValidNewProduct, ValidProductUpdate},
        query::ProductFilter,
        records::{ProductId, ProductListing, ProductRecord},
    },
    slugs::escape_like,
};

const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const GET_PRODUCT_BY_ID_SQL: &str = include_str!("sql/get_product_by_id.sql");
const LOCK_PRODUCT_SQL: &str = include_str!("sql/lock_product.sql");
const CATEGORY_EXISTS_SQL: &str = include_str!("sql/category_exists.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");

const LIST_PRODUCTS_SELECT: &str = "SELECT p.id, p.name, p.slug, p.price, p.stock, \
     p.is_active, p.created_at, c.name AS category_name \
     FROM products p JOIN categories c ON c.id = p.category_id";

const COUNT_PRODUCTS_SELECT: &str =
    "SELECT COUNT(*) FROM products p JOIN categories c ON c.id = p.category_id";

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn count_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &ProductFilter,
    ) -> Result<u64, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new(COUNT_PRODUCTS_SELECT);

        push_filter(&mut builder, filter);

        let count: i64 = builder.build_query_scalar().fetch_one(&mut **tx).await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &ProductFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ProductListing>, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new(LIST_PRODUCTS_SELECT);

        push_filter(&mut builder, filter);

        builder
            .push(" ORDER BY ")
            .push(filter.ordering.to_sql())
            .push(" LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        builder
            .build_query_as::<ProductListing>()
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        slug: &str,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(slug)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_product_by_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductId,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_BY_ID_SQL)
            .bind(product.into_i64())
            .fetch_one(&mut **tx)
            .await
    }

    /// Lock a product row for update, returning its id and current name.
    pub(crate) async fn lock_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        slug: &str,
    ) -> Result<(ProductId, String), sqlx::Error> {
        let (id, name): (i64, String) = query_as(LOCK_PRODUCT_SQL)
            .bind(slug)
            .fetch_one(&mut **tx)
            .await?;

        Ok((ProductId::from_i64(id), name))
    }

    pub(crate) async fn category_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        category: CategoryId,
    ) -> Result<bool, sqlx::Error> {
        query_scalar::<Postgres, bool>(CATEGORY_EXISTS_SQL)
            .bind(category.into_i64())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: &ValidNewProduct,
        slug: &str,
    ) -> Result<ProductId, sqlx::Error> {
        let id: i64 = query_scalar(CREATE_PRODUCT_SQL)
            .bind(product.category.into_i64())
            .bind(&product.name)
            .bind(slug)
            .bind(&product.description)
            .bind(product.price)
            .bind(product.stock)
            .bind(product.is_active)
            .fetch_one(&mut **tx)
            .await?;

        Ok(ProductId::from_i64(id))
    }

    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductId,
        update: &ValidProductUpdate,
        slug: Option<&str>,
    ) -> Result<ProductId, sqlx::Error> {
        let id: i64 = query_scalar(UPDATE_PRODUCT_SQL)
            .bind(product.into_i64())
            .bind(update.category.map(CategoryId::into_i64))
            .bind(update.name.as_deref())
            .bind(slug)
            .bind(update.description.as_deref())
            .bind(update.price)
            .bind(update.stock)
            .bind(update.is_active)
            .fetch_one(&mut **tx)
            .await?;

        Ok(ProductId::from_i64(id))
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        slug: &str,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(slug)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

/// Append the `WHERE` clause for `filter`. Every value is bound.
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    builder.push(" WHERE TRUE");

    if let Some(slug) = &filter.category_slug {
        builder.push(" AND c.slug = ").push_bind(slug.clone());
    }

    if let Some(category) = filter.category_id {
        builder
            .push(" AND p.category_id = ")
            .push_bind(category.into_i64());
    }

    if let Some(min_price) = filter.min_price {
        builder.push(" AND p.price >= ").push_bind(min_price);
    }

    if let Some(max_price) = filter.max_price {
        builder.push(" AND p.price <= ").push_bind(max_price);
    }

    if let Some(is_active) = filter.is_active {
        builder.push(" AND p.is_active = ").push_bind(is_active);
    }

    for term in &filter.search {
        let pattern = format!("%{}%", escape_like(term));

        builder
            .push(" AND (p.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: ProductId::from_i64(row.try_get("id")?),
            category: CategorySummary {
                id: CategoryId::from_i64(row.try_get("category_id")?),
                name: row.try_get("category_name")?,
                slug: row.try_get("category_slug")?,
            },
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            stock: row.try_get("stock")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ProductListing {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: ProductId::from_i64(row.try_get("id")?),
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            price: row.try_get("price")?,
            stock: row.try_get("stock")?,
            is_active: row.try_get("is_active")?,
            category_name: row.try_get("category_name")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
