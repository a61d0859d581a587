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

//! Epic Auth API library.
//!
//! Bridges Epic Games' OAuth2 authorization-code flow to the wallet frontend.
//! The callback exchanges the code, verifies the returned JWT against Epic's
//! published key set and hands the token to the frontend. The binary entry
//! point (`main.rs`) is a thin wrapper that calls into this library.

pub mod config;
pub mod error;
pub mod oauth;
pub mod redirect;
pub mod routes;
pub mod state;
