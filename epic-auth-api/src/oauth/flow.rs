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

//! The callback pipeline: code → token → decode → key → verify.
//!
//! Each stage returns early with a [`CallbackError`]; nothing is retried.

use crate::config::OAuthConfig;
use crate::error::CallbackError;

use super::exchange::exchange_code;
use super::jwks::JwkSet;
use super::jwt::DecodedJwt;
use super::verify::verify_jwt_signature;

/// Run the full callback flow for `code` and return the verified token.
///
/// The returned string is exactly what the token endpoint issued.
pub async fn verify_callback(
    http: &reqwest::Client,
    oauth: &OAuthConfig<'_>,
    code: Option<&str>,
) -> Result<String, CallbackError> {
    let code = code
        .filter(|c| !c.trim().is_empty())
        .ok_or(CallbackError::MissingCode)?;

    let token = exchange_code(http, oauth, code).await?;

    let jwt = DecodedJwt::decode(&token)?;
    let jwks = JwkSet::fetch(http, oauth.jwks_url).await?;
    let key = jwks.find(&jwt.header.kid)?.rsa_public_key()?;
    verify_jwt_signature(key, &jwt)?;
    log_claims(&jwt);

    Ok(token)
}

fn log_claims(jwt: &DecodedJwt<'_>) {
    match jwt.claims() {
        Ok(claims) => tracing::debug!(
            kid = %jwt.header.kid,
            sub = ?claims.get("sub"),
            iss = ?claims.get("iss"),
            exp = ?claims.get("exp"),
            "Verified Epic token claims"
        ),
        Err(e) => tracing::debug!("Verified token payload is not JSON: {e}"),
    }
}
