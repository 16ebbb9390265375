/*
 * Responsibility
 * - Config読み込み (JWT_SECRET が無ければここで起動失敗) → 依存生成 → Router 組み立て
 * - アクセスログ (TraceLayer) の適用
 * - axum::serve() で起動
 */
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{api, config::Config, services::auth::TokenVerifier, state::AppState};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,authgate=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub async fn run() -> Result<()> {
    init_tracing();

    let config = Config::from_env().inspect_err(|err| {
        tracing::error!(error = %err, "refusing to start");
    })?;

    tracing::info!(
        addr = %config.addr,
        leeway_seconds = config.jwt_leeway_seconds,
        issuer = ?config.jwt_issuer,
        audience = ?config.jwt_audience,
        "starting authgate"
    );

    let state = build_state(&config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_state(config: &Config) -> AppState {
    let verifier = Arc::new(TokenVerifier::from_config(config));
    AppState::new(verifier)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api::v1::routes(&state))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
