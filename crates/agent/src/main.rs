// SPDX-License-Identifier: MIT

//! hashfleet-agent: the worker-host runtime entry point (C2). Loads
//! configuration, builds the embedded control-plane client this workspace
//! uses in place of a transport layer (see `hf_agent::client`), and runs the
//! init -> registered -> running -> draining -> exited state machine until a
//! termination signal arrives.

use hf_adapters::{CrackerProcess, RealCracker};
use hf_agent::{AgentConfig, AgentRuntime, ControlPlaneClient, InProcessClient};
use hf_core::{Clock, SystemClock};
use hf_daemon::{ControlPlane, HealthMonitorConfig};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging() -> tracing_appender::non_blocking::WorkerGuard {
    let log_dir = hf_agent::env::log_dir();
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("hashfleet-agent: could not create log directory {}: {e}", log_dir.display());
    }
    let file_appender = tracing_appender::rolling::daily(&log_dir, "hashfleet-agent.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();
    guard
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => warn!(error = %e, "hashfleet-agent: failed to install SIGTERM handler"),
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

#[tokio::main]
async fn main() {
    let _log_guard = init_logging();

    let config_path = hf_agent::env::config_path();
    let config = match AgentConfig::load_or_default(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("hashfleet-agent: failed to load config at {}: {e}", config_path.display());
            std::process::exit(1);
        }
    };
    info!(config_path = %config_path.display(), agent_key = %config.agent_key, "hashfleet-agent starting");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let health_monitor_config = HealthMonitorConfig {
        check_interval: config.control_plane.health_monitor.check_interval(),
        agent_timeout: config.control_plane.health_monitor.agent_timeout(),
        heartbeat_grace: config.control_plane.health_monitor.heartbeat_grace(),
        max_concurrent_checks: config.control_plane.health_monitor.max_concurrent_checks,
    };
    let control_plane = Arc::new(ControlPlane::new(
        config.control_plane.upload_root.clone(),
        health_monitor_config,
        clock.clone(),
    ));
    let client: Arc<dyn ControlPlaneClient> = Arc::new(InProcessClient::new(control_plane));
    let cracker: Arc<dyn CrackerProcess> = Arc::new(RealCracker::new(config.cracker_binary_path.clone()));

    let runtime = Arc::new(AgentRuntime::new(config, client, cracker, clock));
    let registered = match runtime.init().await {
        Ok(registered) => registered,
        Err(e) => {
            error!(error = %e, "hashfleet-agent: fatal error during init");
            std::process::exit(1);
        }
    };

    let cancel = CancellationToken::new();
    let cancel_for_signal = cancel.clone();
    let signal_task = tokio::spawn(async move {
        shutdown_signal().await;
        info!("hashfleet-agent: shutdown signal received, draining background tasks");
        cancel_for_signal.cancel();
    });

    let drain = runtime.run(registered, cancel);
    if tokio::time::timeout(hf_agent::env::drain_timeout(), drain).await.is_err() {
        warn!("hashfleet-agent: background tasks did not drain within the timeout, exiting anyway");
    }
    let _ = signal_task.await;
    info!("hashfleet-agent: shut down cleanly");
}
