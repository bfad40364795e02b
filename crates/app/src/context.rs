//! App Context

use std::sync::Arc;

use sqlx::migrate::MigrateError;
use thiserror::Error;
use tracing::info;

use crate::{
    auth::{AuthConfig, AuthService, PgAuthService},
    database::{self, DatabaseSettings, Db},
    domain::{
        categories::{CategoriesService, PgCategoriesService},
        products::{PgProductsService, ProductsService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to run database migrations")]
    Migrate(#[source] MigrateError),
}

#[derive(Clone)]
pub struct AppContext {
    pub categories: Arc<dyn CategoriesService>,
    pub products: Arc<dyn ProductsService>,
    pub auth: Arc<dyn AuthService>,
}

impl AppContext {
    /// Connect to the database, optionally migrate it, and build every service.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a connection or migrating fails.
    pub async fn connect(
        settings: &DatabaseSettings,
        auth: &AuthConfig,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(&settings.url, settings.max_connections)
            .await
            .map_err(AppInitError::Database)?;

        if settings.run_migrations {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrate)?;

            info!("database migrations applied");
        }

        Ok(Self::from_db(Db::new(pool), auth))
    }

    /// Build every service on top of an existing pool.
    #[must_use]
    pub fn from_db(db: Db, auth: &AuthConfig) -> Self {
        Self {
            categories: Arc::new(PgCategoriesService::new(db.clone())),
            products: Arc::new(PgProductsService::new(db.clone())),
            auth: Arc::new(PgAuthService::new(db, auth)),
        }
    }
}
