//! yourtext server
//!
//! Main entry point: loads configuration, provisions the bucket, then serves
//! uploads and downloads.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use yourtext_api::{AppState, create_router};
use yourtext_core::bootstrap::ensure_bucket;
use yourtext_core::relay::{RelayConfig, TextRelay};
use yourtext_core::storage::build_store;
use yourtext_shared::{AppConfig, LogFormat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is not an error
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(config.server.log_format);

    let store = build_store(&config.storage.provider).context("failed to initialize storage")?;
    info!(
        provider = config.storage.provider.name(),
        bucket = %config.storage.bucket,
        "Storage configured"
    );

    // Nothing is served until the bucket exists
    ensure_bucket(store.as_ref(), &config.storage.bucket)
        .await
        .context("bucket provisioning failed")?;

    let relay_config = RelayConfig::new(config.storage.bucket.clone())
        .with_base_url(config.server.public_base_url())
        .with_max_content_length(config.storage.max_content_length)
        .with_operation_timeout(Duration::from_secs(config.storage.operation_timeout_secs));
    let relay = Arc::new(TextRelay::new(store, relay_config));

    let app = create_router(AppState::new(relay));

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(
        "Server listening on {}, serving links under {}",
        addr,
        config.server.public_base_url()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "yourtext=debug,tower_http=debug".into());

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }
}

/// Signal that stopped the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shutdown {
    Interrupt,
    Terminate,
}

/// Resolves on Ctrl-C, or on SIGTERM from a process supervisor.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = first_signal(ctrl_c, terminate).await;
    info!(signal = ?signal, "Shutdown signal received");
}

async fn first_signal(
    interrupt: impl Future<Output = ()>,
    terminate: impl Future<Output = ()>,
) -> Shutdown {
    tokio::select! {
        () = interrupt => Shutdown::Interrupt,
        () = terminate => Shutdown::Terminate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::{pending, ready};

    #[tokio::test]
    async fn test_terminate_alone_stops_server() {
        assert_eq!(first_signal(pending(), ready(())).await, Shutdown::Terminate);
    }

    #[tokio::test]
    async fn test_interrupt_alone_stops_server() {
        assert_eq!(first_signal(ready(()), pending()).await, Shutdown::Interrupt);
    }
}
