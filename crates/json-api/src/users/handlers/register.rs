//! Register Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::Deserialize;
use tracing::info;

use catalog_app::domain::users::data::{NewUser, Password};

use crate::{
    errors::ApiError,
    extensions::*,
    state::State,
    users::{UserResponse, errors::into_api_error},
};

/// Register Request
#[derive(Default, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<RegisterRequest> for NewUser {
    fn from(request: RegisterRequest) -> Self {
        NewUser {
            username: request.username,
            email: request.email,
            password: Password::from(request.password),
            password_confirm: Password::from(request.password_confirm),
            first_name: request.first_name,
            last_name: request.last_name,
        }
    }
}

/// Register Handler
///
/// Creates a user account.
#[endpoint(
    tags("auth"),
    summary = "Register",
    responses(
        (status_code = StatusCode::CREATED, description = "User created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid fields"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RegisterRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<UserResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let user = state
        .auth()
        .register_user(json.into_inner().into())
        .await
        .map_err(into_api_error)?;

    info!(user_id = %user.id, username = %user.username, "registered user");

    res.status_code(StatusCode::CREATED);

    Ok(Json(user.into()))
}
