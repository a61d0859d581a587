/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! OAuth route handlers: index, login, callback.
//!
//! `/callback` never answers with an error status for a failed login. It
//! always redirects to the wallet frontend, with the verified token in the
//! fragment or a reason in `epic_login_error`.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::oauth;
use crate::redirect::found;
use crate::state::AppState;

const INDEX_HTML: &str = "<!DOCTYPE html>\
<html><head><title>Epic Auth</title></head>\
<body><h1>Epic Auth</h1>\
<p>This service signs you in with your Epic Games account.</p>\
<p><a href=\"/login\">Log in with Epic Games</a></p>\
</body></html>";

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
}

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /login
///
/// Redirects to the Epic authorize endpoint with this service's callback URI.
pub async fn login(State(state): State<AppState>) -> Result<Response, ConfigError> {
    let oauth_cfg = state.oauth.require()?;
    let auth_url = oauth::build_authorize_url(&oauth_cfg);
    Ok(found(auth_url.as_str()))
}

/// GET /callback?code=...
///
/// Exchanges the code, verifies the token against Epic's JWKS and redirects to
/// the frontend.
pub async fn callback(
    State(state): State<AppState>,
    query: Result<Query<CallbackQuery>, QueryRejection>,
) -> Result<Response, ConfigError> {
    let oauth_cfg = state.oauth.require()?;

    let code = match query {
        Ok(Query(query)) => query.code,
        Err(rejection) => {
            tracing::warn!("Unreadable callback query: {rejection}");
            None
        }
    };

    let location = match oauth::verify_callback(&state.http, &oauth_cfg, code.as_deref()).await {
        Ok(token) => {
            tracing::info!("Epic login verified, redirecting token to frontend");
            oauth_cfg.frontend.with_token(&token)
        }
        Err(err) => {
            tracing::warn!("Epic login failed: {err}");
            oauth_cfg.frontend.with_error(&err.reason())
        }
    };

    Ok(found(&location))
}

/// Any unrouted path.
pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}
