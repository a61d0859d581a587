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

//! JWKS (JSON Web Key Set) retrieval.
//!
//! The key set is fetched on every callback and dropped afterwards; there is no
//! cache, so a rotated key is picked up on the very next login.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rsa::{BigUint, RsaPublicKey};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::CallbackError;

use super::jwt::decode_base64url;
use super::verify::EXPECTED_ALG;

/// A JWKS document. Anything that does not deserialize into this shape is
/// rejected as a whole.
#[derive(Debug, Serialize, Deserialize)]
pub struct JwkSet {
    pub keys: Vec<Jwk>,
}

/// A JWK entry from the JWKS endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct Jwk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    #[serde(default, rename = "use", skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
    // RSA fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
}

impl JwkSet {
    /// GET the key set from `jwks_url`.
    pub async fn fetch(http: &reqwest::Client, jwks_url: &Url) -> Result<Self, CallbackError> {
        let resp = http.get(jwks_url.clone()).send().await.map_err(|e| {
            tracing::error!("JWKS request to {jwks_url} failed: {e}");
            CallbackError::from(e)
        })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            tracing::error!("JWKS fetch failed. Status: {status}, Body: {body}");
            return Err(CallbackError::UpstreamJwksFailed(status.as_u16()));
        }

        let body = resp.bytes().await?;
        Self::parse(&body)
    }

    pub fn parse(body: &[u8]) -> Result<Self, CallbackError> {
        serde_json::from_slice(body).map_err(|e| {
            tracing::error!("JWKS document rejected: {e}");
            CallbackError::InvalidJwksFormat(e.to_string())
        })
    }

    /// The key whose `kid` equals `kid`. Keys without a `kid` never match.
    pub fn find(&self, kid: &str) -> Result<&Jwk, CallbackError> {
        self.keys
            .iter()
            .find(|jwk| jwk.kid.as_deref() == Some(kid))
            .ok_or_else(|| CallbackError::KeyNotFound(kid.to_string()))
    }
}

impl Jwk {
    /// Import this entry as an RSA public key from its `n` and `e` members.
    ///
    /// Import is part of verification: a key that is not an RSA signing key
    /// for RS256, or whose parameters do not decode, fails exactly like a bad
    /// signature.
    pub fn rsa_public_key(&self) -> Result<RsaPublicKey, CallbackError> {
        let rejected = |detail: String| {
            tracing::warn!("JWKS key {:?} cannot be used: {detail}", self.kid);
            CallbackError::SignatureInvalid
        };

        match self.kty.as_deref() {
            Some("RSA") => {}
            other => return Err(rejected(format!("unsupported kty {other:?}"))),
        }
        if let Some(key_use) = self.key_use.as_deref().filter(|u| *u != "sig") {
            return Err(rejected(format!("key use is {key_use:?}, not \"sig\"")));
        }
        if let Some(alg) = self.alg.as_deref().filter(|a| *a != EXPECTED_ALG) {
            return Err(rejected(format!("key alg is {alg:?}, not {EXPECTED_ALG}")));
        }

        let n = self
            .n
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| rejected("missing modulus".into()))?;
        let e = self
            .e
            .as_deref()
            .filter(|e| !e.is_empty())
            .ok_or_else(|| rejected("missing exponent".into()))?;

        let n = decode_base64url(n).map_err(|err| rejected(format!("modulus: {err}")))?;
        let e = decode_base64url(e).map_err(|err| rejected(format!("exponent: {err}")))?;

        RsaPublicKey::new(BigUint::from_bytes_be(&n), BigUint::from_bytes_be(&e))
            .map_err(|err| rejected(err.to_string()))
    }

    /// Build an RSA JWK for `key`, as a provider would publish it.
    pub fn from_rsa_public_key(kid: &str, key: &RsaPublicKey) -> Self {
        use rsa::traits::PublicKeyParts;

        Self {
            kid: Some(kid.to_string()),
            kty: Some("RSA".to_string()),
            alg: Some("RS256".to_string()),
            key_use: Some("sig".to_string()),
            n: Some(URL_SAFE_NO_PAD.encode(key.n().to_bytes_be())),
            e: Some(URL_SAFE_NO_PAD.encode(key.e().to_bytes_be())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oauth::test_keys::test_private_key;

    #[test]
    fn parses_provider_document() {
        let doc = br#"{"keys":[
            {"kty":"RSA","kid":"a","use":"sig","alg":"RS256","n":"AQAB","e":"AQAB"},
            {"kty":"EC","kid":"b","crv":"P-256","x":"AA","y":"AA"},
            {"kty":"RSA","n":"AQAB","e":"AQAB"}
        ]}"#;
        let set = JwkSet::parse(doc).unwrap();
        assert_eq!(set.keys.len(), 3);
        assert_eq!(set.find("b").unwrap().kty.as_deref(), Some("EC"));
        assert_eq!(set.find("a").unwrap().key_use.as_deref(), Some("sig"));
    }

    #[test]
    fn malformed_documents_are_rejected() {
        for doc in [
            &br#"[]"#[..],
            &br#""keys""#[..],
            &br#"{}"#[..],
            &br#"{"keys":{}}"#[..],
            &br#"{"keys":"nope"}"#[..],
            &br#"{"keys":[1,2]}"#[..],
            &b"<html>"[..],
        ] {
            assert!(
                matches!(JwkSet::parse(doc), Err(CallbackError::InvalidJwksFormat(_))),
                "{} should be rejected",
                String::from_utf8_lossy(doc)
            );
        }
    }

    #[test]
    fn missing_kid_is_key_not_found() {
        let set = JwkSet::parse(br#"{"keys":[]}"#).unwrap();
        assert!(matches!(set.find("a"), Err(CallbackError::KeyNotFound(kid)) if kid == "a"));

        let set = JwkSet::parse(br#"{"keys":[{"kty":"RSA","kid":"other"}]}"#).unwrap();
        assert!(matches!(set.find("a"), Err(CallbackError::KeyNotFound(_))));
    }

    #[test]
    fn rsa_key_roundtrips_through_jwk() {
        let public = test_private_key().to_public_key();
        let jwk = Jwk::from_rsa_public_key("kid-1", &public);
        assert_eq!(jwk.rsa_public_key().unwrap(), public);
    }

    #[test]
    fn unusable_keys_fail_as_invalid_signature() {
        let set = JwkSet::parse(
            br#"{"keys":[
                {"kty":"EC","kid":"ec","crv":"P-256","x":"AA","y":"AA"},
                {"kty":"RSA","kid":"no-n","e":"AQAB"},
                {"kty":"RSA","kid":"bad-n","n":"***","e":"AQAB"},
                {"kty":"RSA","kid":"zero-n","n":"AA","e":"AQAB"},
                {"kty":"RSA","kid":"one-n","n":"AQ","e":"AQAB"},
                {"kty":"RSA","kid":"enc","use":"enc","n":"AQAB","e":"AQAB"},
                {"kty":"RSA","kid":"rs512","alg":"RS512","n":"AQAB","e":"AQAB"},
                {"kid":"no-kty","n":"AQAB","e":"AQAB"}
            ]}"#,
        )
        .unwrap();

        for kid in [
            "ec", "no-n", "bad-n", "zero-n", "one-n", "enc", "rs512", "no-kty",
        ] {
            let err = set.find(kid).unwrap().rsa_public_key().unwrap_err();
            assert!(
                matches!(err, CallbackError::SignatureInvalid),
                "{kid}: {err}"
            );
        }
    }

    #[test]
    fn key_without_use_or_alg_is_accepted() {
        let public = test_private_key().to_public_key();
        let mut jwk = Jwk::from_rsa_public_key("kid-1", &public);
        jwk.alg = None;
        jwk.key_use = None;
        assert_eq!(jwk.rsa_public_key().unwrap(), public);
    }
}
