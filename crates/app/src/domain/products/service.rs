//! Products service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        categories::records::CategoryId,
        pagination::{Page, PageRequest},
        products::{
            data::{NewProduct, ProductUpdate},
            errors::ProductsServiceError,
            query::ProductFilter,
            records::{ProductListing, ProductRecord},
            repository::PgProductsRepository,
        },
        slugs::{PgSlugsRepository, SlugKind},
    },
    validation::ValidationErrors,
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
    slugs: PgSlugsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
            slugs: PgSlugsRepository::new(SlugKind::Product),
        }
    }
}

fn unknown_category(category: CategoryId) -> ProductsServiceError {
    ProductsServiceError::Validation(ValidationErrors::single(
        "category",
        format!("Invalid pk \"{category}\" - object does not exist."),
    ))
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(
        &self,
        filter: ProductFilter,
        page: PageRequest,
    ) -> Result<Page<ProductListing>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let count = self.repository.count_products(&mut tx, &filter).await?;
        let window = page.resolve(count)?;

        let products = self
            .repository
            .list_products(&mut tx, &filter, window.offset(), window.limit())
            .await?;

        tx.commit().await?;

        Ok(Page::new(products, count, window))
    }

    async fn get_product(&self, slug: &str) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product(&mut tx, slug).await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let product = product.validated()?;

        let mut tx = self.db.begin().await?;

        if !self
            .repository
            .category_exists(&mut tx, product.category)
            .await?
        {
            return Err(unknown_category(product.category));
        }

        let slug = match &product.slug {
            Some(slug) => {
                self.slugs.ensure_available(&mut tx, slug, None).await?;
                slug.clone()
            }
            None => self.slugs.derive_unique(&mut tx, &product.name, None).await?,
        };

        let id = self
            .repository
            .create_product(&mut tx, &product, &slug)
            .await?;

        let created = self.repository.get_product_by_id(&mut tx, id).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_product(
        &self,
        slug: &str,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let update = update.validated()?;

        let mut tx = self.db.begin().await?;

        let (id, current_name) = self.repository.lock_product(&mut tx, slug).await?;
        let own_id = Some(id.into_i64());

        if let Some(category) = update.category
            && !self.repository.category_exists(&mut tx, category).await?
        {
            return Err(unknown_category(category));
        }

        let new_slug = match (&update.slug, update.name.as_deref()) {
            (Some(explicit), _) => {
                self.slugs.ensure_available(&mut tx, explicit, own_id).await?;
                Some(explicit.clone())
            }
            (None, Some(name)) if name != current_name => {
                Some(self.slugs.derive_unique(&mut tx, name, own_id).await?)
            }
            (None, _) => None,
        };

        let id = self
            .repository
            .update_product(&mut tx, id, &update, new_slug.as_deref())
            .await?;

        let updated = self.repository.get_product_by_id(&mut tx, id).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_product(&self, slug: &str) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_product(&mut tx, slug).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves one page of products matching `filter`.
    async fn list_products(
        &self,
        filter: ProductFilter,
        page: PageRequest,
    ) -> Result<Page<ProductListing>, ProductsServiceError>;

    /// Retrieve a single product by slug.
    async fn get_product(&self, slug: &str) -> Result<ProductRecord, ProductsServiceError>;

    /// Creates a product in an existing category.
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Applies the supplied fields to the product with the given slug.
    async fn update_product(
        &self,
        slug: &str,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Deletes the product with the given slug.
    async fn delete_product(&self, slug: &str) -> Result<(), ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        domain::{
            pagination::PageNumber,
            products::query::{ProductListParams, ProductOrdering},
        },
        test::{TestContext, helpers},
    };

    use super::*;

    fn price(raw: &str) -> Decimal {
        Decimal::from_str(raw).expect("decimal literal")
    }

    #[tokio::test]
    async fn create_product_embeds_category_and_derives_slug() -> TestResult {
        let ctx = TestContext::new().await;
        let category = helpers::create_category(&ctx, "Lighting").await?;

        let product = helpers::create_product(&ctx, category.id, "Desk Lamp", price("19.99")).await?;

        assert_eq!(product.slug, "desk-lamp");
        assert_eq!(product.price, price("19.99"));
        assert_eq!(product.stock, 0);
        assert!(product.is_active);
        assert_eq!(product.category.slug, "lighting");
        assert_eq!(product.category.id, category.id);

        Ok(())
    }

    #[tokio::test]
    async fn back_to_back_same_names_get_numbered_slugs() -> TestResult {
        let ctx = TestContext::new().await;
        let category = helpers::create_category(&ctx, "Lighting").await?;

        let mut slugs = Vec::new();

        for _ in 0..3 {
            slugs.push(
                helpers::create_product(&ctx, category.id, "Lamp", price("5"))
                    .await?
                    .slug,
            );
        }

        assert_eq!(slugs, vec!["lamp", "lamp-1", "lamp-2"]);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_category_is_a_field_error() {
        let ctx = TestContext::new().await;

        let result =
            helpers::create_product(&ctx, CategoryId::from_i64(999), "Lamp", price("5")).await;

        assert!(
            matches!(&result, Err(ProductsServiceError::Validation(e)) if e.messages_for("category").len() == 1),
            "expected category validation error, got {result:?}"
        );
    }

    #[tokio::test]
    async fn negative_price_creates_nothing() -> TestResult {
        let ctx = TestContext::new().await;
        let category = helpers::create_category(&ctx, "Lighting").await?;

        let result = helpers::create_product(&ctx, category.id, "Lamp", price("-1")).await;

        assert!(matches!(result, Err(ProductsServiceError::Validation(_))));

        let page = ctx
            .products
            .list_products(ProductFilter::default(), PageRequest::default())
            .await?;

        assert_eq!(page.count, 0);

        Ok(())
    }

    #[tokio::test]
    async fn explicit_slug_of_another_product_fails_on_update() -> TestResult {
        let ctx = TestContext::new().await;
        let category = helpers::create_category(&ctx, "Lighting").await?;

        helpers::create_product(&ctx, category.id, "Lamp", price("5")).await?;
        let chair = helpers::create_product(&ctx, category.id, "Chair", price("5")).await?;

        let result = ctx
            .products
            .update_product(
                &chair.slug,
                ProductUpdate {
                    slug: Some("lamp".to_owned()),
                    ..ProductUpdate::default()
                },
            )
            .await;

        assert!(
            matches!(&result, Err(ProductsServiceError::Validation(e)) if e.messages_for("slug").len() == 1),
            "expected slug validation error, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn partial_update_changes_only_supplied_fields() -> TestResult {
        let ctx = TestContext::new().await;
        let lighting = helpers::create_category(&ctx, "Lighting").await?;
        let seating = helpers::create_category(&ctx, "Seating").await?;

        let lamp = helpers::create_product(&ctx, lighting.id, "Lamp", price("5")).await?;

        let updated = ctx
            .products
            .update_product(
                &lamp.slug,
                ProductUpdate {
                    category: Some(seating.id),
                    stock: Some(12),
                    ..ProductUpdate::default()
                },
            )
            .await?;

        assert_eq!(updated.slug, "lamp");
        assert_eq!(updated.name, "Lamp");
        assert_eq!(updated.price, price("5"));
        assert_eq!(updated.stock, 12);
        assert_eq!(updated.category.slug, "seating");
        assert!(updated.updated_at >= lamp.updated_at);

        Ok(())
    }

    #[tokio::test]
    async fn rename_recomputes_slug() -> TestResult {
        let ctx = TestContext::new().await;
        let category = helpers::create_category(&ctx, "Lighting").await?;

        let lamp = helpers::create_product(&ctx, category.id, "Lamp", price("5")).await?;

        let renamed = ctx
            .products
            .update_product(
                &lamp.slug,
                ProductUpdate {
                    name: Some("Floor Lamp".to_owned()),
                    ..ProductUpdate::default()
                },
            )
            .await?;

        assert_eq!(renamed.slug, "floor-lamp");

        let result = ctx.products.get_product("lamp").await;

        assert!(matches!(result, Err(ProductsServiceError::NotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn price_range_is_inclusive() -> TestResult {
        let ctx = TestContext::new().await;
        let category = helpers::create_category(&ctx, "Misc").await?;

        for (name, amount) in [("a", "5"), ("b", "10"), ("c", "30"), ("d", "50"), ("e", "50.01")] {
            helpers::create_product(&ctx, category.id, name, price(amount)).await?;
        }

        let filter = ProductFilter::from_params(ProductListParams {
            min_price: Some("10".to_owned()),
            max_price: Some("50".to_owned()),
            ordering: Some("price".to_owned()),
            ..ProductListParams::default()
        })?;

        let page = ctx
            .products
            .list_products(filter, PageRequest::default())
            .await?;

        let names: Vec<&str> = page.results.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(names, vec!["b", "c", "d"]);

        let open_ended = ProductFilter {
            min_price: Some(price("30")),
            ..ProductFilter::default()
        };

        let page = ctx
            .products
            .list_products(open_ended, PageRequest::default())
            .await?;

        assert_eq!(page.count, 3);

        Ok(())
    }

    #[tokio::test]
    async fn descending_price_breaks_ties_by_insertion() -> TestResult {
        let ctx = TestContext::new().await;
        let category = helpers::create_category(&ctx, "Misc").await?;

        for (name, amount) in [("first", "20"), ("second", "35"), ("third", "20"), ("fourth", "1")] {
            helpers::create_product(&ctx, category.id, name, price(amount)).await?;
        }

        let filter = ProductFilter {
            ordering: ProductOrdering::parse("-price"),
            ..ProductFilter::default()
        };

        let page = ctx
            .products
            .list_products(filter, PageRequest::default())
            .await?;

        let names: Vec<&str> = page.results.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(names, vec!["second", "first", "third", "fourth"]);
        assert!(page.results.windows(2).all(|w| w[0].price >= w[1].price));

        Ok(())
    }

    #[tokio::test]
    async fn search_requires_every_term() -> TestResult {
        let ctx = TestContext::new().await;
        let category = helpers::create_category(&ctx, "Misc").await?;

        helpers::create_product(&ctx, category.id, "Red Chair", price("1")).await?;
        helpers::create_product(&ctx, category.id, "Red Lamp", price("1")).await?;
        helpers::create_product(&ctx, category.id, "Blue Chair", price("1")).await?;

        let filter = ProductFilter::from_params(ProductListParams {
            search: Some("chair, RED".to_owned()),
            ..ProductListParams::default()
        })?;

        let page = ctx
            .products
            .list_products(filter, PageRequest::default())
            .await?;

        assert_eq!(page.count, 1);
        assert_eq!(page.results[0].name, "Red Chair");
        assert_eq!(page.results[0].category_name, "Misc");

        Ok(())
    }

    #[tokio::test]
    async fn category_and_active_filters_combine() -> TestResult {
        let ctx = TestContext::new().await;
        let lighting = helpers::create_category(&ctx, "Lighting").await?;
        let seating = helpers::create_category(&ctx, "Seating").await?;

        helpers::create_product(&ctx, lighting.id, "Lamp", price("1")).await?;
        helpers::create_product(&ctx, seating.id, "Chair", price("1")).await?;

        let hidden = helpers::create_product(&ctx, lighting.id, "Sconce", price("1")).await?;

        ctx.products
            .update_product(
                &hidden.slug,
                ProductUpdate {
                    is_active: Some(false),
                    ..ProductUpdate::default()
                },
            )
            .await?;

        let filter = ProductFilter {
            category_slug: Some("lighting".to_owned()),
            is_active: Some(true),
            ..ProductFilter::default()
        };

        let page = ctx
            .products
            .list_products(filter, PageRequest::default())
            .await?;

        assert_eq!(page.count, 1);
        assert_eq!(page.results[0].name, "Lamp");

        let by_id = ProductFilter {
            category_id: Some(seating.id),
            ..ProductFilter::default()
        };

        let page = ctx
            .products
            .list_products(by_id, PageRequest::default())
            .await?;

        assert_eq!(page.count, 1);
        assert_eq!(page.results[0].name, "Chair");

        Ok(())
    }

    #[tokio::test]
    async fn forty_five_products_page_as_twenty_twenty_five() -> TestResult {
        let ctx = TestContext::new().await;
        let category = helpers::create_category(&ctx, "Bulk").await?;

        for i in 0..45 {
            helpers::create_product(&ctx, category.id, &format!("Item {i}"), price("1")).await?;
        }

        let mut sizes = Vec::new();

        for number in 1..=3 {
            let page = ctx
                .products
                .list_products(
                    ProductFilter::default(),
                    PageRequest::new(PageNumber::Number(number), 20),
                )
                .await?;

            assert_eq!(page.count, 45);
            sizes.push(page.results.len());
        }

        assert_eq!(sizes, vec![20, 20, 5]);

        let whole = ctx
            .products
            .list_products(
                ProductFilter::default(),
                PageRequest::new(PageNumber::Number(1), 100),
            )
            .await?;

        assert_eq!(whole.results.len(), 45);
        assert!(!whole.has_next());

        let beyond = ctx
            .products
            .list_products(
                ProductFilter::default(),
                PageRequest::new(PageNumber::Number(4), 20),
            )
            .await;

        assert!(matches!(beyond, Err(ProductsServiceError::InvalidPage)));

        Ok(())
    }

    #[tokio::test]
    async fn delete_product_then_get_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let category = helpers::create_category(&ctx, "Misc").await?;
        let lamp = helpers::create_product(&ctx, category.id, "Lamp", price("1")).await?;

        ctx.products.delete_product(&lamp.slug).await?;

        let result = ctx.products.get_product(&lamp.slug).await;

        assert!(matches!(result, Err(ProductsServiceError::NotFound)));

        let again = ctx.products.delete_product(&lamp.slug).await;

        assert!(matches!(again, Err(ProductsServiceError::NotFound)));

        Ok(())
    }
}
