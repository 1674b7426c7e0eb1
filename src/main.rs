//! Read-Through Cache - demo server
//!
//! Greets "World" three times through the cache at startup, logging the
//! latency of each call, then serves the cached greeter over HTTP.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use read_through_cache::{
    api::create_router, demo::run_timing_demo, spawn_cleanup_task, AppState, Config,
};

/// Number of measured calls in the startup demo.
const DEMO_ROUNDS: usize = 3;

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cached greeter
/// 4. Start background TTL cleanup task
/// 5. Run the timing demo
/// 6. Serve HTTP until SIGINT/SIGTERM, then stop the cleanup task
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "read_through_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting read-through cache demo");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_name={}, ttl={}s, max_entries={}, greet_delay={}ms, port={}",
        config.cache_name,
        config.cache_ttl,
        config.cache_max_entries,
        config.greet_delay_ms,
        config.server_port
    );

    let state = AppState::from_config(&config);

    let cleanup = spawn_cleanup_task(
        state.greeter.cache().clone(),
        config.cleanup_interval(),
    );

    run_timing_demo(&state.greeter, "World", DEMO_ROUNDS)
        .await
        .context("startup demo failed")?;

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    cleanup.shutdown().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
