//! Auth middleware.
//!
//! [`authenticate`] resolves an optional bearer token into a user id;
//! [`writes_require_user`] turns away anonymous callers on unsafe methods.

use std::sync::Arc;

use salvo::{
    http::{Method, header::AUTHORIZATION},
    prelude::*,
};
use tracing::error;

use catalog_app::auth::AuthServiceError;

use crate::{extensions::*, state::State};

/// Outcome of inspecting the `Authorization` header.
#[derive(Debug, PartialEq, Eq)]
enum Credentials<'a> {
    Absent,
    Bearer(&'a str),
    Malformed,
}

#[salvo::handler]
pub(crate) async fn authenticate(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let token = match extract_credentials(req) {
        Credentials::Absent => {
            ctrl.call_next(req, depot, res).await;

            return;
        }
        Credentials::Malformed => {
            res.render(StatusError::unauthorized().brief("Invalid Authorization header"));
            ctrl.skip_rest();

            return;
        }
        Credentials::Bearer(token) => token.to_owned(),
    };

    let state = match depot.obtain::<Arc<State>>() {
        Ok(state) => state,
        Err(_error) => {
            res.render(StatusError::internal_server_error());
            ctrl.skip_rest();

            return;
        }
    };

    let user = match state.auth().authenticate_bearer(&token).await {
        Ok(user) => user,
        Err(
            AuthServiceError::InvalidToken
            | AuthServiceError::InvalidCredentials
            | AuthServiceError::NotFound,
        ) => {
            res.render(StatusError::unauthorized().brief("Given token not valid for any token type"));
            ctrl.skip_rest();

            return;
        }
        Err(source) => {
            error!("failed to authenticate bearer token: {source}");

            res.render(StatusError::internal_server_error());
            ctrl.skip_rest();

            return;
        }
    };

    depot.insert_user_id(user);

    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn writes_require_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if is_safe_method(req.method()) || depot.user_id().is_some() {
        ctrl.call_next(req, depot, res).await;

        return;
    }

    res.render(StatusError::unauthorized().brief("Authentication credentials were not provided."));
    ctrl.skip_rest();
}

fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Only the `Bearer` scheme is understood; other schemes are left to pass as anonymous.
fn extract_credentials(req: &Request) -> Credentials<'_> {
    let Some(value) = req.headers().get(AUTHORIZATION) else {
        return Credentials::Absent;
    };

    let Ok(value) = value.to_str() else {
        return Credentials::Malformed;
    };

    let mut parts = value.trim().splitn(2, ' ');

    let scheme = parts.next().unwrap_or_default();

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Credentials::Absent;
    }

    match parts.next().map(str::trim) {
        Some(token) if !token.is_empty() && !token.contains(' ') => Credentials::Bearer(token),
        _ => Credentials::Malformed,
    }
}
