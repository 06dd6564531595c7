use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use skv_engine::Cache;
use skv_server::{app, AppState};

/// One shard of the keyspace served over HTTP.
#[derive(Debug, Parser)]
#[command(name = "skv-server", about = "TTL-aware key-value cache shard")]
struct Args {
    /// Listen address.
    #[arg(long, default_value = "0.0.0.0:8080")]
    addr: String,

    /// Shared secret every request must present in the Authorization header.
    /// Empty disables authentication.
    #[arg(long, default_value = "")]
    psw: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let secret: Option<Arc<str>> = (!args.psw.is_empty()).then(|| Arc::from(args.psw.as_str()));
    let state = AppState {
        cache: Arc::new(Cache::new()),
        secret,
    };

    let listener = TcpListener::bind(&args.addr)
        .await
        .with_context(|| format!("binding {}", args.addr))?;
    tracing::info!(addr = %args.addr, auth = state.secret.is_some(), "serving cache shard");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server exited")?;
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM, whichever arrives first.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::warn!(%err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutting down");
}
