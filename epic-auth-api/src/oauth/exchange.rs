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

//! Authorize URL construction and authorization code → token exchange.

use serde::Deserialize;
use url::Url;

use crate::config::OAuthConfig;
use crate::error::CallbackError;

/// The fields of Epic's token response this service reads.
#[derive(Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
}

/// Build the Epic authorization URL. Parameters are URL-encoded; `scope` is
/// appended only when configured.
pub fn build_authorize_url(oauth: &OAuthConfig<'_>) -> Url {
    let mut url = oauth.authorize_url.clone();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("client_id", oauth.client_id);
        pairs.append_pair("response_type", "code");
        pairs.append_pair("redirect_uri", oauth.redirect_uri);
        if let Some(scope) = oauth.scope {
            pairs.append_pair("scope", scope);
        }
    }
    url
}

/// Exchange an authorization code for the access token, authenticating with
/// HTTP Basic client credentials.
pub async fn exchange_code(
    http: &reqwest::Client,
    oauth: &OAuthConfig<'_>,
    code: &str,
) -> Result<String, CallbackError> {
    let params = [
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", oauth.redirect_uri),
    ];

    let response = http
        .post(oauth.token_url.clone())
        .basic_auth(oauth.client_id, Some(oauth.client_secret))
        .form(&params)
        .send()
        .await
        .map_err(|e| {
            tracing::error!("OAuth token request failed: {e}");
            CallbackError::from(e)
        })?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::error!("OAuth token request failed. Status: {status}, Body: {body}");
        return Err(CallbackError::UpstreamExchangeFailed(status.as_u16()));
    }

    let body = response.bytes().await?;
    let token_response: TokenResponse = serde_json::from_slice(&body).map_err(|e| {
        CallbackError::UnexpectedServerError(format!("Failed to parse OAuth response: {e}"))
    })?;

    if let Some(account_id) = &token_response.account_id {
        tracing::debug!("Token exchange succeeded for Epic account {account_id}");
    }

    token_response
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or(CallbackError::MissingToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn config(extra: &[(&str, &str)]) -> Config {
        let mut vars = vec![
            ("EPIC_CLIENT_ID", "client123"),
            ("EPIC_CLIENT_SECRET", "secret"),
            ("EPIC_REDIRECT_URI", "https://auth.example.com/callback"),
            ("FRONTEND_URL", "https://wallet.example.com"),
            ("EPIC_AUTHORIZE_URL", "https://provider.example.com/id/authorize"),
        ];
        vars.extend_from_slice(extra);
        Config::from_vars(|key| {
            vars.iter()
                .rev()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
        .unwrap()
    }

    #[test]
    fn authorize_url_carries_client_and_encoded_redirect() {
        let config = config(&[]);
        let url = build_authorize_url(&config.oauth.require().unwrap());
        assert_eq!(
            url.as_str(),
            "https://provider.example.com/id/authorize?client_id=client123\
             &response_type=code\
             &redirect_uri=https%3A%2F%2Fauth.example.com%2Fcallback"
        );
    }

    #[test]
    fn authorize_url_includes_scope_when_set() {
        let config = config(&[("EPIC_SCOPE", "basic_profile openid")]);
        let url = build_authorize_url(&config.oauth.require().unwrap());
        assert!(!url.as_str().contains(' '), "URL must not contain literal spaces");
        assert!(url.as_str().ends_with("&scope=basic_profile+openid"));
    }

    #[test]
    fn authorize_url_omits_scope_when_unset() {
        let config = config(&[]);
        let url = build_authorize_url(&config.oauth.require().unwrap());
        assert!(!url.as_str().contains("scope="));
    }
}
