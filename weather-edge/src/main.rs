//! Edge service entry point: configuration, telemetry, and the HTTP server
//! lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use weather_core::telemetry;
use weather_edge::client::OrchestratorClient;
use weather_edge::config::Config;
use weather_edge::handlers::{self, AppState};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init("weather_edge");

    let config = Config::from_env()?;
    tracing::info!(port = config.port, "starting edge service");
    tracing::info!("  orchestrator: {}", config.orchestrator_base_url);

    let state = Arc::new(AppState {
        orchestrator: OrchestratorClient::new(&config.orchestrator_base_url),
    });

    let cancel_token = CancellationToken::new();
    spawn_shutdown_signal(cancel_token.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {addr}");

    let mut server = tokio::spawn({
        let cancel = cancel_token.clone();
        let app = handlers::router(state);
        async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    cancel.cancelled().await;
                    tracing::info!("server received shutdown signal");
                })
                .await
        }
    });

    tokio::select! {
        result = &mut server => {
            result??;
            tracing::warn!("server stopped before a shutdown signal");
        }
        () = cancel_token.cancelled() => {
            tracing::info!("shutting down server...");
            match tokio::time::timeout(SHUTDOWN_GRACE, &mut server).await {
                Ok(result) => {
                    result??;
                    tracing::info!("server shut down");
                }
                Err(_) => {
                    tracing::warn!("graceful shutdown timed out, aborting in-flight requests");
                    server.abort();
                }
            }
        }
    }

    tracing::info!("telemetry flushed, exiting");
    Ok(())
}

/// Cancels the token on SIGINT or SIGTERM.
fn spawn_shutdown_signal(cancel_token: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = async {
            tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => tracing::info!("received Ctrl+C, initiating graceful shutdown..."),
            () = terminate => tracing::info!("received SIGTERM, initiating graceful shutdown..."),
        }

        cancel_token.cancel();
    });
}
