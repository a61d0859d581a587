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

//! Application configuration loaded from environment variables.

use std::env;
use std::fmt;

use url::Url;

use crate::error::ConfigError;
use crate::redirect::FrontendRedirect;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8787";
pub const DEFAULT_AUTHORIZE_URL: &str = "https://www.epicgames.com/id/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://api.epicgames.dev/epic/oauth/v2/token";
pub const DEFAULT_JWKS_URL: &str = "https://api.epicgames.dev/epic/oauth/v2/.well-known/jwks.json";

/// Configuration for the Epic Auth API.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the HTTP server (e.g. "0.0.0.0:8787").
    pub listen_addr: String,
    /// Epic OAuth client and provider endpoints.
    pub oauth: OAuthSettings,
}

/// Epic OAuth settings as loaded from the environment.
///
/// The four client values stay optional here: a missing one does not stop the
/// process, it fails each request through [`OAuthSettings::require`].
#[derive(Clone)]
pub struct OAuthSettings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// This service's own `/callback` URL, exactly as registered with Epic.
    pub redirect_uri: Option<String>,
    /// Base URL of the wallet frontend.
    pub frontend_url: Option<String>,
    pub authorize_url: Url,
    pub token_url: Url,
    pub jwks_url: Url,
    pub scope: Option<String>,
}

/// Validated, borrowed view of [`OAuthSettings`] used for one request.
pub struct OAuthConfig<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub redirect_uri: &'a str,
    pub frontend: FrontendRedirect<'a>,
    pub authorize_url: &'a Url,
    pub token_url: &'a Url,
    pub jwks_url: &'a Url,
    pub scope: Option<&'a str>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Required (checked per request)
    /// - `EPIC_CLIENT_ID`, `EPIC_CLIENT_SECRET`, `EPIC_REDIRECT_URI`, `FRONTEND_URL`
    ///
    /// # Optional
    /// - `LISTEN_ADDR` (default: `"0.0.0.0:8787"`)
    /// - `EPIC_AUTHORIZE_URL`, `EPIC_TOKEN_URL`, `EPIC_JWKS_URL` (Epic production defaults)
    /// - `EPIC_SCOPE`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an arbitrary variable lookup.
    /// Empty values are treated as unset.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let url_var = |name: &'static str, default: &str| {
            let raw = var(name).unwrap_or_else(|| default.to_string());
            Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl { name, source })
        };

        let oauth = OAuthSettings {
            client_id: var("EPIC_CLIENT_ID"),
            client_secret: var("EPIC_CLIENT_SECRET"),
            redirect_uri: var("EPIC_REDIRECT_URI"),
            frontend_url: var("FRONTEND_URL"),
            authorize_url: url_var("EPIC_AUTHORIZE_URL", DEFAULT_AUTHORIZE_URL)?,
            token_url: url_var("EPIC_TOKEN_URL", DEFAULT_TOKEN_URL)?,
            jwks_url: url_var("EPIC_JWKS_URL", DEFAULT_JWKS_URL)?,
            scope: var("EPIC_SCOPE"),
        };

        Ok(Self {
            listen_addr: var("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
            oauth,
        })
    }
}

impl OAuthSettings {
    /// Check that every value the OAuth flow needs is present.
    pub fn require(&self) -> Result<OAuthConfig<'_>, ConfigError> {
        let frontend_url = required(&self.frontend_url, "FRONTEND_URL")?;

        Ok(OAuthConfig {
            client_id: required(&self.client_id, "EPIC_CLIENT_ID")?,
            client_secret: required(&self.client_secret, "EPIC_CLIENT_SECRET")?,
            redirect_uri: required(&self.redirect_uri, "EPIC_REDIRECT_URI")?,
            frontend: FrontendRedirect::parse(frontend_url)?,
            authorize_url: &self.authorize_url,
            token_url: &self.token_url,
            jwks_url: &self.jwks_url,
            scope: self.scope.as_deref().filter(|s| !s.trim().is_empty()),
        })
    }
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, ConfigError> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

// The client secret must never end up in logs.
impl fmt::Debug for OAuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthSettings")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("redirect_uri", &self.redirect_uri)
            .field("frontend_url", &self.frontend_url)
            .field("authorize_url", &self.authorize_url.as_str())
            .field("token_url", &self.token_url.as_str())
            .field("jwks_url", &self.jwks_url.as_str())
            .field("scope", &self.scope)
            .finish()
    }
}
