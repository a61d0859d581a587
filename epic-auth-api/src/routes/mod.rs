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

//! Axum router configuration for the Epic Auth API.

pub mod oauth;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Build the application router. Unknown paths and unsupported methods on
/// known paths both answer 404.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(oauth::index).fallback(oauth::not_found))
        .route("/login", get(oauth::login).fallback(oauth::not_found))
        .route("/callback", get(oauth::callback).fallback(oauth::not_found))
        .fallback(oauth::not_found)
}
