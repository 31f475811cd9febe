// SPDX-License-Identifier: MIT

//! Centralized environment variable access for the daemon binary.

use std::path::PathBuf;
use std::time::Duration;

/// Config file path: `HASHFLEET_CONFIG` > `XDG_CONFIG_HOME/hashfleet/hashfleetd.toml`
/// > `~/.config/hashfleet/hashfleetd.toml`.
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("HASHFLEET_CONFIG") {
        return PathBuf::from(path);
    }
    let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("hashfleet").join("hashfleetd.toml")
}

/// Directory tracing-appender rolls log files into.
pub fn log_dir() -> PathBuf {
    std::env::var("HASHFLEET_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")).join("hashfleet").join("logs"))
}

/// How long the daemon waits for background tasks to notice cancellation
/// before exiting anyway.
pub fn drain_timeout() -> Duration {
    std::env::var("HASHFLEET_DRAIN_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

/// PID/lock file path guarding the single-writer assumption (spec §1: "a
/// single writer (one control-plane process) is assumed"). Defaults next to
/// the log directory rather than the config directory, since it is runtime
/// state, not configuration.
pub fn lock_path() -> PathBuf {
    std::env::var("HASHFLEET_LOCK_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")).join("hashfleet").join("hashfleetd.lock"))
}
