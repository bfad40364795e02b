//! Token Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use catalog_app::{
    auth::TokenPair,
    domain::users::data::Password,
    validation::{REQUIRED_MESSAGE, ValidationErrors},
};

use crate::{errors::ApiError, extensions::*, state::State, users::errors::into_api_error};

/// Token Request
#[derive(Default, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct TokenRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Token Pair Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

impl From<TokenPair> for TokenPairResponse {
    fn from(pair: TokenPair) -> Self {
        TokenPairResponse {
            access: pair.access,
            refresh: pair.refresh,
        }
    }
}

/// Token Handler
///
/// Exchanges a username and password for an access and refresh token.
#[endpoint(
    tags("auth"),
    summary = "Obtain Token Pair",
    responses(
        (status_code = StatusCode::OK, description = "Tokens issued"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid credentials"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<TokenRequest>,
    depot: &mut Depot,
) -> Result<Json<TokenPairResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let mut errors = ValidationErrors::new();

    if request.username.is_none() {
        errors.add("username", REQUIRED_MESSAGE);
    }

    if request.password.is_none() {
        errors.add("password", REQUIRED_MESSAGE);
    }

    errors.into_result()?;

    let username = request.username.unwrap_or_default();
    let password = Password::from(request.password.unwrap_or_default());

    let pair = state
        .auth()
        .obtain_token_pair(&username, password)
        .await
        .map_err(into_api_error)?;

    info!(username = %username, "issued token pair");

    Ok(Json(pair.into()))
}
