//! Categories service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        categories::{
            data::{CategoryUpdate, NewCategory},
            errors::CategoriesServiceError,
            records::CategoryRecord,
            repository::PgCategoriesRepository,
        },
        slugs::{PgSlugsRepository, SlugKind},
    },
};

#[derive(Debug, Clone)]
pub struct PgCategoriesService {
    db: Db,
    repository: PgCategoriesRepository,
    slugs: PgSlugsRepository,
}

impl PgCategoriesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCategoriesRepository::new(),
            slugs: PgSlugsRepository::new(SlugKind::Category),
        }
    }
}

#[async_trait]
impl CategoriesService for PgCategoriesService {
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, CategoriesServiceError> {
        let mut tx = self.db.begin().await?;

        let categories = self.repository.list_categories(&mut tx).await?;

        tx.commit().await?;

        Ok(categories)
    }

    async fn get_category(&self, slug: &str) -> Result<CategoryRecord, CategoriesServiceError> {
        let mut tx = self.db.begin().await?;

        let category = self.repository.get_category(&mut tx, slug).await?;

        tx.commit().await?;

        Ok(category)
    }

    async fn create_category(
        &self,
        category: NewCategory,
    ) -> Result<CategoryRecord, CategoriesServiceError> {
        let category = category.validated()?;

        let mut tx = self.db.begin().await?;

        let slug = match category.slug {
            Some(slug) => {
                self.slugs.ensure_available(&mut tx, &slug, None).await?;
                slug
            }
            None => {
                self.slugs
                    .derive_unique(&mut tx, &category.name, None)
                    .await?
            }
        };

        let created = self
            .repository
            .create_category(&mut tx, &category.name, &slug, &category.description)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_category(
        &self,
        slug: &str,
        update: CategoryUpdate,
    ) -> Result<CategoryRecord, CategoriesServiceError> {
        let update = update.validated()?;

        let mut tx = self.db.begin().await?;

        let current = self.repository.lock_category(&mut tx, slug).await?;
        let own_id = Some(current.id.into_i64());

        let new_slug = match (update.slug, update.name.as_deref()) {
            (Some(explicit), _) => {
                self.slugs.ensure_available(&mut tx, &explicit, own_id).await?;
                Some(explicit)
            }
            (None, Some(name)) if name != current.name => {
                Some(self.slugs.derive_unique(&mut tx, name, own_id).await?)
            }
            (None, _) => None,
        };

        let updated = self
            .repository
            .update_category(
                &mut tx,
                current.id,
                update.name.as_deref(),
                new_slug.as_deref(),
                update.description.as_deref(),
            )
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_category(&self, slug: &str) -> Result<u64, CategoriesServiceError> {
        let mut tx = self.db.begin().await?;

        let category = self.repository.lock_category(&mut tx, slug).await?;

        let removed_products = self
            .repository
            .delete_category_products(&mut tx, category.id)
            .await?;

        let rows_affected = self.repository.delete_category(&mut tx, category.id).await?;

        if rows_affected == 0 {
            return Err(CategoriesServiceError::NotFound);
        }

        tx.commit().await?;

        info!(category = %category.slug, removed_products, "deleted category");

        Ok(removed_products)
    }
}

#[automock]
#[async_trait]
pub trait CategoriesService: Send + Sync {
    /// Retrieves every category ordered by name.
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, CategoriesServiceError>;

    /// Retrieve a single category by slug.
    async fn get_category(&self, slug: &str) -> Result<CategoryRecord, CategoriesServiceError>;

    /// Creates a category, deriving a unique slug when none is given.
    async fn create_category(
        &self,
        category: NewCategory,
    ) -> Result<CategoryRecord, CategoriesServiceError>;

    /// Applies the supplied fields to the category with the given slug.
    async fn update_category(
        &self,
        slug: &str,
        update: CategoryUpdate,
    ) -> Result<CategoryRecord, CategoriesServiceError>;

    /// Deletes a category and all of its products, returning the number of
    /// products removed.
    async fn delete_category(&self, slug: &str) -> Result<u64, CategoriesServiceError>;
}
