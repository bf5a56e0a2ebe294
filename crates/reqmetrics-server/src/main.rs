//! reqmetrics-server
//!
//! Demo HTTP service instrumented with request count, failure count, and
//! latency metrics, exported to a monitoring backend every minute.
//!
//! ```text
//! reqmetrics-server --project_id my-project
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use reqmetrics_core::error::{Result, ReqMetricsError};
use reqmetrics_core::stats::Registry;
use reqmetrics_server::{app_state::AppState, config, export, obs, router};

#[derive(Parser)]
#[command(name = "reqmetrics-server", about = "Request metrics demo service")]
struct Cli {
    /// Cloud project the exported metrics belong to.
    #[arg(long = "project_id", default_value = "")]
    project_id: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    obs::init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, class = e.class().as_str(), "reqmetrics-server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    config::validate_project_id(&cli.project_id)?;

    let path = std::env::var(config::CONFIG_ENV)
        .unwrap_or_else(|_| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::load_or_default(&path)?;
    let listen = cfg.server.listen_addr()?;

    // Views go in before the first request can record anything.
    let registry = Arc::new(Registry::new());
    let sli = obs::SliMetrics::register(&registry)?;

    let sink = export::build_sink(&cfg.exporter, &cli.project_id)?;
    let mut exporter = export::Exporter::new(
        Arc::clone(&registry),
        sink,
        export::ExporterOptions {
            project_id: cli.project_id.clone(),
            metric_prefix: cfg.exporter.metric_prefix.clone(),
        },
    );

    let state = AppState::new(registry, sli, cfg.handler.seed);
    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| ReqMetricsError::Config(format!("bind {listen} failed: {e}")))?;

    exporter.start(cfg.exporter.interval());
    tracing::info!(%listen, project_id = %cli.project_id, "reqmetrics-server listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    exporter.shutdown().await;
    served.map_err(|e| ReqMetricsError::Internal(format!("server failed: {e}")))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("interrupt received, shutting down"),
        _ = terminate => obs::log_termination(),
    }
}
