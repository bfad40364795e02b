//! Token Refresh Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use catalog_app::validation::REQUIRED_MESSAGE;

use crate::{errors::ApiError, extensions::*, state::State, users::errors::into_api_error};

/// Refresh Request
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct RefreshRequest {
    pub refresh: Option<String>,
}

/// Access Token Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AccessTokenResponse {
    pub access: String,
}

/// Token Refresh Handler
///
/// Exchanges a refresh token for a new access token.
#[endpoint(
    tags("auth"),
    summary = "Refresh Access Token",
    responses(
        (status_code = StatusCode::OK, description = "Access token issued"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid or expired refresh token"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RefreshRequest>,
    depot: &mut Depot,
) -> Result<Json<AccessTokenResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let Some(refresh) = json.into_inner().refresh else {
        return Err(ApiError::field("refresh", REQUIRED_MESSAGE));
    };

    let access = state
        .auth()
        .refresh_access_token(&refresh)
        .await
        .map_err(into_api_error)?;

    Ok(Json(AccessTokenResponse { access }))
}
