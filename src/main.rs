//! order-tracker server.
//!
//! Loads configuration, starts the seeded order store, and serves the `/orders` API until
//! Ctrl-C. Handlers live in [`order_tracker::api`].

use std::sync::Arc;

use anyhow::{anyhow, Context};
use axum::http::{header, HeaderValue, Method};
use order_tracker::api::{build_router, AppState};
use order_tracker::config::AppConfig;
use order_tracker::lifecycle::{setup_tracing, OrderSystem};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Silent if the file does not exist.
    let _ = dotenvy::from_filename(".env.local");

    setup_tracing();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let system = OrderSystem::new(&config);

    let state = Arc::new(AppState::new(system.order_client.clone(), system.policy));
    let app = build_router(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_localhost_only());

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    info!("order-tracker listening on http://{}", config.addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server crashed")?;

    system.shutdown().await.map_err(|e| anyhow!(e))?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // no signal handler available; serve until the process is killed
        std::future::pending::<()>().await;
    }
    info!("Ctrl-C received, draining connections");
}

/// Browser access is limited to the dashboard's local dev server (Next.js, port 3000).
fn cors_localhost_only() -> CorsLayer {
    let origins = ["http://localhost:3000", "http://127.0.0.1:3000"]
        .map(HeaderValue::from_static);

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::PATCH])
        .allow_headers([header::CONTENT_TYPE])
}
