//! `menubot serve` -- run the webhook server until Ctrl+C or SIGTERM.

use anyhow::Result;
use console::style;

use menubot_types::config::AppConfig;

use crate::http::router::build_router;
use crate::state::AppState;

/// Start the server, the session sweeper, and wait for a shutdown signal.
///
/// The sweeper is stopped and joined after the server drains, whether the
/// server exited cleanly or not.
pub async fn serve(mut config: AppConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let ttl = config.session.ttl();
    let sweep_interval = config.session.sweep_interval();

    let state = AppState::init(config).await?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    state.sessions().start_eviction(ttl, sweep_interval);
    tracing::info!(%addr, flows = state.flows().len(), "menubot listening");

    println!(
        "  {} menubot listening on {}",
        style("⚡").bold(),
        style(format!("http://{addr}")).cyan()
    );
    println!("  {}", style("Press Ctrl+C to stop").dim());

    let served = axum::serve(listener, build_router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    state.sessions().stop_eviction().await;
    served?;

    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
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

    tracing::info!("shutdown signal received");
}
