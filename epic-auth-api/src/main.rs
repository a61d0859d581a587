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

//! Epic Auth API server entry point.

use epic_auth_api::config::Config;
use epic_auth_api::routes;
use epic_auth_api::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env().expect("failed to load configuration");

    if let Err(e) = config.oauth.require() {
        tracing::warn!("OAuth is not fully configured, /login and /callback will fail: {e}");
    }

    let state = AppState::new(&config);
    let app = routes::router().with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("failed to bind listener");

    tracing::info!("Epic Auth API listening on {}", config.listen_addr);

    axum::serve(listener, app).await.expect("server error");
}
