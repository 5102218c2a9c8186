use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod error;
mod healthcheck;
mod server;

use config::{Config, LogConfig, LogFormat};

const DEFAULT_LOG_FILTER: &str = "hello_worker=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // When invoked as a Docker HEALTHCHECK, probe /health and exit immediately.
    // This avoids needing any external tool (curl/wget) in the container image.
    if std::env::args().nth(1).as_deref() == Some("--healthcheck") {
        let healthy = healthcheck::run().await?;
        std::process::exit(if healthy { 0 } else { 1 });
    }

    let (config_path, config) = Config::from_env()?;

    init_tracing(&config.log);

    let addr = config.socket_addr()?;
    info!(
        %addr,
        config = %config_path.display(),
        log_format = %config.log.format,
        "hello-worker starting"
    );

    let listener = server::bind(addr).await?;
    info!(%addr, "HTTP API listening");

    server::serve(listener, shutdown_signal()).await?;

    info!("shutdown complete");
    Ok(())
}

/// `RUST_LOG` wins; otherwise `[log] level`, otherwise [`DEFAULT_LOG_FILTER`].
fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(log.level.as_deref().unwrap_or(DEFAULT_LOG_FILTER))
    });

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log.format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("SIGINT received, draining connections"),
        _ = terminate => info!("SIGTERM received, draining connections"),
    }
}
