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

//! Epic OAuth2 helpers: authorize URL, token exchange, JWT decoding, JWKS
//! retrieval and RS256 verification.

pub mod exchange;
pub mod flow;
pub mod jwks;
pub mod jwt;
pub mod verify;

#[cfg(test)]
mod test_keys;

pub use exchange::{build_authorize_url, exchange_code, TokenResponse};
pub use flow::verify_callback;
pub use jwks::{Jwk, JwkSet};
pub use jwt::{decode_base64url, DecodedJwt, JwtHeader};
pub use verify::{verify_jwt_signature, verify_rs256};
