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

//! Shared application state passed to every Axum handler via `State`.

use std::sync::Arc;

use crate::config::{Config, OAuthSettings};

/// Application state shared across all request handlers. Immutable; nothing
/// here outlives a request except the HTTP connection pool.
#[derive(Clone)]
pub struct AppState {
    /// Outbound client for the token and JWKS endpoints.
    pub http: reqwest::Client,
    /// Epic OAuth settings, validated per request.
    pub oauth: Arc<OAuthSettings>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self::with_settings(config.oauth.clone())
    }

    pub fn with_settings(oauth: OAuthSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            oauth: Arc::new(oauth),
        }
    }
}
