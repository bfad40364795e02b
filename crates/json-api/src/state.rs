//! Shared handler state.

use std::sync::Arc;

use catalog_app::{
    auth::AuthService,
    context::AppContext,
    domain::{categories::CategoriesService, products::ProductsService},
};

/// Services every handler reaches through the depot.
#[derive(Clone)]
pub(crate) struct State {
    app: AppContext,
}

impl State {
    pub(crate) fn shared(app: AppContext) -> Arc<Self> {
        Arc::new(Self { app })
    }

    pub(crate) fn categories(&self) -> &dyn CategoriesService {
        self.app.categories.as_ref()
    }

    pub(crate) fn products(&self) -> &dyn ProductsService {
        self.app.products.as_ref()
    }

    pub(crate) fn auth(&self) -> &dyn AuthService {
        self.app.auth.as_ref()
    }
}
