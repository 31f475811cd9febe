// SPDX-License-Identifier: MIT

//! hashfleetd: the control-plane process entry point. Loads configuration,
//! wires up the [`ControlPlane`], and spawns its two cooperative background
//! tasks (auto-assignment, health sweep) until a shutdown signal arrives.

use fs2::FileExt;
use hf_core::{Clock, SystemClock};
use hf_daemon::{env, ControlPlane, DaemonConfig};
use std::io::Write;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Acquire the single-writer lock (spec §1: one control-plane process is
/// assumed). Held for the lifetime of the process; an already-running
/// `hashfleetd` makes this fail fast rather than let two processes mutate
/// the same in-memory state from two OS processes.
fn acquire_single_instance_lock(path: &std::path::Path) -> std::io::Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let lock_file = std::fs::OpenOptions::new().write(true).create(true).truncate(false).open(path)?;
    lock_file.try_lock_exclusive().map_err(|e| {
        std::io::Error::new(e.kind(), format!("another hashfleetd instance already holds the lock at {}", path.display()))
    })?;
    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;
    Ok(lock_file)
}

fn init_logging() -> tracing_appender::non_blocking::WorkerGuard {
    let log_dir = env::log_dir();
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("hashfleetd: could not create log directory {}: {e}", log_dir.display());
    }
    let file_appender = tracing_appender::rolling::daily(&log_dir, "hashfleetd.log");
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
            Err(e) => warn!(error = %e, "hashfleetd: failed to install SIGTERM handler"),
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

    let lock_path = env::lock_path();
    let _lock_file = match acquire_single_instance_lock(&lock_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("hashfleetd: {e}");
            std::process::exit(1);
        }
    };

    let config_path = env::config_path();
    let config = match DaemonConfig::load_or_default(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("hashfleetd: failed to load config at {}: {e}", config_path.display());
            std::process::exit(1);
        }
    };
    info!(config_path = %config_path.display(), upload_root = %config.upload_root.display(), "hashfleetd starting");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let health_monitor_config = hf_engine::HealthMonitorConfig {
        check_interval: config.health_monitor.check_interval(),
        agent_timeout: config.health_monitor.agent_timeout(),
        heartbeat_grace: config.health_monitor.heartbeat_grace(),
        max_concurrent_checks: config.health_monitor.max_concurrent_checks,
    };
    let control_plane = Arc::new(ControlPlane::new(config.upload_root.clone(), health_monitor_config, clock));

    let cancel = CancellationToken::new();

    let health_handle = {
        let control_plane = control_plane.clone();
        let cancel = cancel.child_token();
        tokio::spawn(async move {
            control_plane.health_monitor().run(control_plane.bus(), cancel).await;
        })
    };

    let assign_handle = {
        let control_plane = control_plane.clone();
        let cancel = cancel.child_token();
        let interval = config.health_monitor.check_interval();
        tokio::spawn(async move {
            control_plane.scheduler().run_auto_assign(interval, cancel).await;
        })
    };

    shutdown_signal().await;
    info!("hashfleetd: shutdown signal received, draining background tasks");
    cancel.cancel();

    let drain = async {
        let _ = tokio::join!(health_handle, assign_handle);
    };
    if tokio::time::timeout(env::drain_timeout(), drain).await.is_err() {
        warn!("hashfleetd: background tasks did not drain within the timeout, exiting anyway");
    }
    info!("hashfleetd: shut down cleanly");
}
