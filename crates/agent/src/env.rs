// SPDX-License-Identifier: MIT

//! Centralized environment variable access for the agent binary.

use std::path::PathBuf;
use std::time::Duration;

/// Config file path: `HASHFLEET_AGENT_CONFIG` > `XDG_CONFIG_HOME/hashfleet/hashfleet-agent.toml`
/// > `~/.config/hashfleet/hashfleet-agent.toml`.
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("HASHFLEET_AGENT_CONFIG") {
        return PathBuf::from(path);
    }
    let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("hashfleet").join("hashfleet-agent.toml")
}

/// Directory tracing-appender rolls log files into.
pub fn log_dir() -> PathBuf {
    std::env::var("HASHFLEET_AGENT_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")).join("hashfleet").join("agent-logs"))
}

/// How long the agent waits for background tasks to notice cancellation
/// before exiting anyway.
pub fn drain_timeout() -> Duration {
    std::env::var("HASHFLEET_AGENT_DRAIN_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(10))
}
