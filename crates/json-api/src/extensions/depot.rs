//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use catalog_app::domain::users::records::UserId;

const USER_ID_DEPOT_KEY: &str = "user_id";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Record the authenticated caller for downstream handlers.
    fn insert_user_id(&mut self, user: UserId);

    /// The authenticated caller, if the request carried a valid token.
    fn user_id(&self) -> Option<UserId>;

    fn user_id_or_401(&self) -> Result<UserId, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_user_id(&mut self, user: UserId) {
        self.insert(USER_ID_DEPOT_KEY, user);
    }

    fn user_id(&self) -> Option<UserId> {
        self.get::<UserId>(USER_ID_DEPOT_KEY).ok().copied()
    }

    fn user_id_or_401(&self) -> Result<UserId, StatusError> {
        self.user_id().ok_or_else(|| {
            StatusError::unauthorized().brief("Authentication credentials were not provided.")
        })
    }
}
