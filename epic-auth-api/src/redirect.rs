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

//! Redirects back to the wallet frontend.
//!
//! A verified token travels in the URL fragment (`#epic_jwt=`) so the browser
//! never sends it to a server on later navigation. Failures travel in the
//! query string (`?epic_login_error=`).

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use url::Url;

use crate::error::ConfigError;

pub const TOKEN_FRAGMENT_KEY: &str = "epic_jwt";
pub const ERROR_QUERY_KEY: &str = "epic_login_error";

/// The configured frontend base URL, kept as written so redirects carry it
/// verbatim.
#[derive(Debug, Clone, Copy)]
pub struct FrontendRedirect<'a> {
    base: &'a str,
}

impl<'a> FrontendRedirect<'a> {
    /// Validate `raw` as an absolute URL. Any fragment on it is dropped.
    pub fn parse(raw: &'a str) -> Result<Self, ConfigError> {
        Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
            name: "FRONTEND_URL",
            source,
        })?;
        let base = raw.split_once('#').map_or(raw, |(base, _)| base);
        Ok(Self { base })
    }

    /// `{base}#epic_jwt={token}`, token unmodified.
    pub fn with_token(&self, token: &str) -> String {
        format!("{}#{TOKEN_FRAGMENT_KEY}={token}", self.base)
    }

    /// `{base}?epic_login_error={reason}`, reason percent-encoded.
    pub fn with_error(&self, reason: &str) -> String {
        let separator = match self.base.rfind('?') {
            Some(i) if i + 1 == self.base.len() => "",
            Some(_) if self.base.ends_with('&') => "",
            Some(_) => "&",
            None => "?",
        };
        format!(
            "{}{separator}{ERROR_QUERY_KEY}={}",
            self.base,
            urlencoding::encode(reason)
        )
    }
}

/// `302 Found` to `location`.
pub fn found(location: &str) -> Response {
    match HeaderValue::try_from(location) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(e) => {
            tracing::error!("Cannot redirect, location is not a valid header value: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
