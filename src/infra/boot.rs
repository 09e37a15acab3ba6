use std::time::Duration;

use anyhow::Context;

use crate::infra::config::Config;
use crate::infra::http_app::{build_app, AppState};

/// In-flight requests get this long after a shutdown signal before the
/// process exits regardless.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

pub async fn run_server() -> anyhow::Result<()> {
    let cfg = Config::from_env().context("loading configuration")?;
    run_with(cfg).await
}

pub async fn run_with(cfg: Config) -> anyhow::Result<()> {
    tracing::info!(
        host = %cfg.host,
        port = cfg.port,
        require_auth = cfg.require_auth,
        secret_configured = cfg.secret_key.is_some(),
        slack_api_base = %cfg.slack_api_base,
        "BOOT mcp-slack-server"
    );
    if cfg.auth_fails_open() {
        tracing::warn!("REQUIRE_AUTH is enabled but SECRET_KEY is not set; tool calls are NOT protected");
    }

    let listener = tokio::net::TcpListener::bind((cfg.host.as_str(), cfg.port))
        .await
        .with_context(|| format!("binding {}:{}", cfg.host, cfg.port))?;
    tracing::info!(addr = ?listener.local_addr().ok(), "listening");

    let app = build_app(AppState::from_config(cfg));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server failure")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!(grace_secs = SHUTDOWN_GRACE.as_secs(), "shutdown signal received");

    tokio::spawn(async {
        tokio::time::sleep(SHUTDOWN_GRACE).await;
        tracing::error!("graceful shutdown timed out; forcing exit");
        std::process::exit(1);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bind_failure_is_reported() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = taken.local_addr().unwrap().port();
        let cfg = Config { host: "127.0.0.1".into(), port, ..Config::default() };
        let err = run_with(cfg).await.unwrap_err();
        assert!(format!("{err:#}").contains(&format!("binding 127.0.0.1:{port}")));
    }

    #[test]
    fn grace_period_is_five_seconds() {
        assert_eq!(SHUTDOWN_GRACE, Duration::from_secs(5));
    }
}
