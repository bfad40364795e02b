//! Profile Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    errors::ApiError,
    extensions::*,
    state::State,
    users::{UserResponse, errors::into_api_error},
};

/// Profile Handler
///
/// Returns the authenticated caller's own account.
#[endpoint(
    tags("auth"),
    summary = "Profile",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Caller's profile"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<UserResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_id_or_401()?;

    let user = state
        .auth()
        .current_user(user)
        .await
        .map_err(into_api_error)?;

    Ok(Json(user.into()))
}
