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

//! Structural decoding of a compact JWS (`header.payload.signature`).
//!
//! Nothing here checks the signature; see [`super::verify`].

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::Deserialize;

use crate::error::CallbackError;

/// Standard alphabet, padding optional. Base64url input is mapped onto it
/// before decoding.
const STANDARD_PAD_INDIFFERENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode one base64url segment. Accepts input with or without `=` padding.
pub fn decode_base64url(segment: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let standard: String = segment
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    STANDARD_PAD_INDIFFERENT.decode(standard)
}

/// JOSE header fields this service relies on.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtHeader {
    pub alg: String,
    pub kid: String,
}

/// A token split into its segments with the header and payload decoded.
///
/// Borrows the original token so the signing input is the exact text the
/// provider signed.
#[derive(Debug)]
pub struct DecodedJwt<'a> {
    pub header: JwtHeader,
    pub payload: Vec<u8>,
    signing_input: &'a str,
    signature_segment: &'a str,
}

impl<'a> DecodedJwt<'a> {
    pub fn decode(token: &'a str) -> Result<Self, CallbackError> {
        let segments: Vec<&str> = token.split('.').collect();
        let [header_segment, payload_segment, signature_segment] = segments[..] else {
            return Err(CallbackError::InvalidTokenFormat(format!(
                "expected 3 segments, found {}",
                segments.len()
            )));
        };

        let header_bytes = decode_base64url(header_segment)
            .map_err(|_| CallbackError::InvalidBase64Url { segment: "header" })?;
        let payload = decode_base64url(payload_segment)
            .map_err(|_| CallbackError::InvalidBase64Url { segment: "payload" })?;

        let header: JwtHeader = serde_json::from_slice(&header_bytes)
            .map_err(|e| CallbackError::InvalidTokenFormat(format!("header: {e}")))?;

        let signing_input = &token[..header_segment.len() + 1 + payload_segment.len()];

        Ok(Self {
            header,
            payload,
            signing_input,
            signature_segment,
        })
    }

    /// `header_segment.payload_segment`, the bytes covered by the signature.
    pub fn signing_input(&self) -> &'a str {
        self.signing_input
    }

    pub fn signature_segment(&self) -> &'a str {
        self.signature_segment
    }

    /// Payload as JSON, for diagnostics only.
    pub fn claims(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    use super::*;

    fn segment(json: &serde_json::Value) -> String {
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(json).unwrap())
    }

    #[test]
    fn decodes_all_padding_lengths() {
        // 3, 2 and 1 input bytes need 0, 1 and 2 padding characters.
        for input in [&b"abc"[..], &b"ab"[..], &b"a"[..]] {
            let unpadded = URL_SAFE_NO_PAD.encode(input);
            assert_eq!(decode_base64url(&unpadded).unwrap(), input);

            let padded = base64::engine::general_purpose::URL_SAFE.encode(input);
            assert_eq!(decode_base64url(&padded).unwrap(), input);
        }
    }

    #[test]
    fn maps_url_safe_alphabet() {
        // 0xfb 0xff encodes to "-_8" in base64url and "+/8" in standard.
        assert_eq!(decode_base64url("-_8").unwrap(), vec![0xfb, 0xff]);
        assert_eq!(decode_base64url("+/8").unwrap(), vec![0xfb, 0xff]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(decode_base64url("***").is_err());
        assert!(decode_base64url("a").is_err());
    }

    #[test]
    fn decodes_header_and_keeps_signing_input() {
        let header = segment(&serde_json::json!({"alg": "RS256", "kid": "key-1", "typ": "JWT"}));
        let payload = segment(&serde_json::json!({"sub": "account-1"}));
        let token = format!("{header}.{payload}.c2ln");

        let jwt = DecodedJwt::decode(&token).unwrap();
        assert_eq!(jwt.header.alg, "RS256");
        assert_eq!(jwt.header.kid, "key-1");
        assert_eq!(jwt.signing_input(), format!("{header}.{payload}"));
        assert_eq!(jwt.signature_segment(), "c2ln");
        assert_eq!(jwt.claims().unwrap()["sub"], "account-1");
    }

    #[test]
    fn wrong_segment_count_is_format_error() {
        for token in ["", "abc", "a.b", "a.b.c.d"] {
            assert!(
                matches!(
                    DecodedJwt::decode(token),
                    Err(CallbackError::InvalidTokenFormat(_))
                ),
                "{token:?} should be rejected"
            );
        }
    }

    #[test]
    fn bad_base64_in_header_or_payload() {
        let header = segment(&serde_json::json!({"alg": "RS256", "kid": "k"}));
        assert!(matches!(
            DecodedJwt::decode("!!.e30.sig"),
            Err(CallbackError::InvalidBase64Url { segment: "header" })
        ));
        assert!(matches!(
            DecodedJwt::decode(&format!("{header}.!!.sig")),
            Err(CallbackError::InvalidBase64Url { segment: "payload" })
        ));
    }

    #[test]
    fn header_without_kid_is_format_error() {
        let header = segment(&serde_json::json!({"alg": "RS256"}));
        let token = format!("{header}.e30.sig");
        assert!(matches!(
            DecodedJwt::decode(&token),
            Err(CallbackError::InvalidTokenFormat(_))
        ));
    }

    #[test]
    fn non_json_payload_only_affects_claims() {
        let header = segment(&serde_json::json!({"alg": "RS256", "kid": "k"}));
        let payload = URL_SAFE_NO_PAD.encode(b"not json");
        let token = format!("{header}.{payload}.sig");
        let jwt = DecodedJwt::decode(&token).unwrap();
        assert!(jwt.claims().is_err());
    }
}
