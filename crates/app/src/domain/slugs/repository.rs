//! Slug Repository

use rustc_hash::FxHashSet;
use sqlx::{Postgres, Transaction, query_scalar};
use tracing::debug;

use crate::domain::slugs::{
    SlugError, SlugKind, escape_like, first_available, probe_prefix, slugify,
    validate_explicit_slug,
};

const CATEGORY_SLUG_CANDIDATES_SQL: &str = include_str!("sql/category_slug_candidates.sql");
const PRODUCT_SLUG_CANDIDATES_SQL: &str = include_str!("sql/product_slug_candidates.sql");
const CATEGORY_SLUG_TAKEN_SQL: &str = include_str!("sql/category_slug_taken.sql");
const PRODUCT_SLUG_TAKEN_SQL: &str = include_str!("sql/product_slug_taken.sql");

#[derive(Debug, Clone, Copy)]
pub(crate) struct PgSlugsRepository {
    kind: SlugKind,
}

impl PgSlugsRepository {
    #[must_use]
    pub(crate) fn new(kind: SlugKind) -> Self {
        Self { kind }
    }

    /// Derive a slug from `name` that no other row uses.
    ///
    /// `exclude` is the id of the row being renamed, whose own slug may be reused.
    pub(crate) async fn derive_unique(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
        exclude: Option<i64>,
    ) -> Result<String, SlugError> {
        let base = slugify(name);

        if base.is_empty() {
            return Err(SlugError::Empty);
        }

        let max_len = self.kind.max_len();
        let pattern = format!("{}%", escape_like(&probe_prefix(&base, max_len)));

        let sql = match self.kind {
            SlugKind::Category => CATEGORY_SLUG_CANDIDATES_SQL,
            SlugKind::Product => PRODUCT_SLUG_CANDIDATES_SQL,
        };

        let taken: FxHashSet<String> = query_scalar::<Postgres, String>(sql)
            .bind(pattern)
            .bind(exclude)
            .fetch_all(&mut **tx)
            .await?
            .into_iter()
            .collect();

        let slug = first_available(&base, max_len, &taken).ok_or(SlugError::Exhausted)?;

        debug!(kind = ?self.kind, %slug, collisions = taken.len(), "derived slug");

        Ok(slug)
    }

    /// Check an explicit slug's format and that no other row uses it.
    pub(crate) async fn ensure_available(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        slug: &str,
        exclude: Option<i64>,
    ) -> Result<(), SlugError> {
        validate_explicit_slug(slug, self.kind)?;

        let sql = match self.kind {
            SlugKind::Category => CATEGORY_SLUG_TAKEN_SQL,
            SlugKind::Product => PRODUCT_SLUG_TAKEN_SQL,
        };

        let taken = query_scalar::<Postgres, bool>(sql)
            .bind(slug)
            .bind(exclude)
            .fetch_one(&mut **tx)
            .await?;

        if taken {
            return Err(SlugError::Taken(self.kind));
        }

        Ok(())
    }
}
