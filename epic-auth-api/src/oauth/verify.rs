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

//! RS256 (RSASSA-PKCS1-v1_5 with SHA-256) signature verification.
//!
//! The algorithm is fixed by Epic's issuance scheme. The header `alg` is never
//! used to pick a verifier.

use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::signature::Verifier;
use rsa::RsaPublicKey;
use sha2::Sha256;

use crate::error::CallbackError;

use super::jwt::{decode_base64url, DecodedJwt};

pub const EXPECTED_ALG: &str = "RS256";

/// Verify `jwt`'s signature segment against its signing input with `key`.
pub fn verify_jwt_signature(key: RsaPublicKey, jwt: &DecodedJwt<'_>) -> Result<(), CallbackError> {
    if jwt.header.alg != EXPECTED_ALG {
        tracing::warn!(
            "JWT header declares alg {:?}, verifying as {EXPECTED_ALG} regardless",
            jwt.header.alg
        );
    }

    let signature = decode_base64url(jwt.signature_segment()).map_err(|e| {
        tracing::debug!("JWT signature segment is not base64url: {e}");
        CallbackError::SignatureInvalid
    })?;

    verify_rs256(key, jwt.signing_input().as_bytes(), &signature)
}

/// Verify a raw PKCS#1 v1.5 / SHA-256 signature over `message`.
///
/// A signature whose length differs from the modulus size is rejected.
pub fn verify_rs256(
    key: RsaPublicKey,
    message: &[u8],
    signature: &[u8],
) -> Result<(), CallbackError> {
    let verifying_key = VerifyingKey::<Sha256>::new(key);
    let signature = Signature::try_from(signature).map_err(|e| {
        tracing::debug!("Malformed RSA signature: {e}");
        CallbackError::SignatureInvalid
    })?;

    verifying_key.verify(message, &signature).map_err(|e| {
        tracing::debug!("RSA signature rejected: {e}");
        CallbackError::SignatureInvalid
    })
}
