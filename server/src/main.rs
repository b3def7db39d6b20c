// Forbid unwrap() in production code.
// Test code is allowed to use unwrap() for convenience.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

use country_server::{
    AppOptions, AppState, auth::AuthGate, config::ServerConfig, router,
};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "country_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match ServerConfig::try_from_args(std::env::args_os()) {
        Ok(config) => config,
        Err(e) if !e.use_stderr() => {
            // --help / --version
            let _ = e.print();
            return;
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let options = AppOptions::default();
    tracing::info!(
        "Loaded configuration: listen_port={}, stream_interval={:?}, protect_stream={}",
        config.listen_port,
        options.stream_interval,
        options.protect_stream
    );

    // Flipped on Ctrl-C so open streams end and graceful shutdown can finish.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let state = AppState::new(
        AuthGate::new(options.auth),
        options.stream_interval,
        shutdown_rx,
    );
    let app = router(state, options.protect_stream);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind: {e}");
            std::process::exit(1);
        });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {e}");
                std::future::pending::<()>().await;
            }
            tracing::info!("shutting down");
            let _ = shutdown_tx.send(true);
        })
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Server error: {e}");
            std::process::exit(1);
        });
}
