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

//! Error types for the callback flow and for service configuration.
//!
//! A [`CallbackError`] never leaves the request as an HTTP error: the callback
//! handler turns it into a redirect to the frontend carrying
//! [`CallbackError::reason`]. Only [`ConfigError`] is rendered as a 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failure at one stage of the OAuth callback.
///
/// `Display` is the server-side diagnostic and may include upstream detail.
/// The frontend only ever sees [`CallbackError::reason`].
#[derive(Debug, Error)]
pub enum CallbackError {
    #[error("authorization code missing from callback query")]
    MissingCode,

    #[error("token endpoint response did not contain an access_token")]
    MissingToken,

    #[error("malformed JWT: {0}")]
    InvalidTokenFormat(String),

    #[error("invalid base64url in JWT {segment} segment")]
    InvalidBase64Url { segment: &'static str },

    #[error("token exchange returned HTTP {0}")]
    UpstreamExchangeFailed(u16),

    #[error("JWKS fetch returned HTTP {0}")]
    UpstreamJwksFailed(u16),

    #[error("malformed JWKS document: {0}")]
    InvalidJwksFormat(String),

    #[error("no JWKS key with kid {0:?}")]
    KeyNotFound(String),

    #[error("RS256 signature verification failed")]
    SignatureInvalid,

    #[error("unexpected server error: {0}")]
    UnexpectedServerError(String),
}

impl CallbackError {
    /// Human-readable reason placed in the `epic_login_error` query parameter.
    ///
    /// Never contains secrets, tokens or raw upstream bodies.
    pub fn reason(&self) -> String {
        match self {
            Self::MissingCode => "Missing authorization code".to_string(),
            Self::MissingToken => "No access token in token response".to_string(),
            Self::InvalidTokenFormat(_) => "Invalid JWT format".to_string(),
            Self::InvalidBase64Url { .. } => "Invalid base64url encoding in JWT".to_string(),
            Self::UpstreamExchangeFailed(status) => format!("Token exchange failed: {status}"),
            Self::UpstreamJwksFailed(status) => format!("JWKS fetch failed: {status}"),
            Self::InvalidJwksFormat(_) => "Invalid JWKS format".to_string(),
            Self::KeyNotFound(_) => "public key not found".to_string(),
            Self::SignatureInvalid => "JWT verification failed".to_string(),
            Self::UnexpectedServerError(_) => "Unexpected server error".to_string(),
        }
    }
}

impl From<reqwest::Error> for CallbackError {
    fn from(err: reqwest::Error) -> Self {
        Self::UnexpectedServerError(err.to_string())
    }
}

/// Missing or malformed service configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{name} is not a valid URL: {source}")]
    InvalidUrl {
        name: &'static str,
        source: url::ParseError,
    },
}

impl IntoResponse for ConfigError {
    fn into_response(self) -> Response {
        tracing::error!("Refusing request, service is misconfigured: {self}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Server misconfigured: {self}"),
        )
            .into_response()
    }
}
