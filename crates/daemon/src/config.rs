// SPDX-License-Identifier: MIT

//! Daemon configuration: a TOML file on disk, with every Health Monitor
//! tunable exposed as a field so none of them are ever hard-coded into the
//! monitor loop itself.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to parse config file {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthMonitorSection {
    pub check_interval_ms: u64,
    pub agent_timeout_ms: u64,
    pub heartbeat_grace_ms: u64,
    pub max_concurrent_checks: usize,
}

impl Default for HealthMonitorSection {
    fn default() -> Self {
        Self { check_interval_ms: 1_000, agent_timeout_ms: 5_000, heartbeat_grace_ms: 2_000, max_concurrent_checks: 20 }
    }
}

impl HealthMonitorSection {
    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }

    pub fn agent_timeout(&self) -> Duration {
        Duration::from_millis(self.agent_timeout_ms)
    }

    pub fn heartbeat_grace(&self) -> Duration {
        Duration::from_millis(self.heartbeat_grace_ms)
    }
}

/// Resolved daemon configuration. Loaded from a TOML file; every field has a
/// sane default so a bare `hashfleetd` with no config file still starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Root directory for uploaded artifacts (wordlists, hash-files, temp).
    pub upload_root: PathBuf,
    /// Where the write-ahead log and migration ledger snapshot live.
    pub state_dir: PathBuf,
    pub health_monitor: HealthMonitorSection,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")).join("hashfleet");
        Self {
            upload_root: base.join("uploads"),
            state_dir: base.join("state"),
            health_monitor: HealthMonitorSection::default(),
        }
    }
}

impl DaemonConfig {
    /// Load from a TOML file at `path`, falling back to defaults for any
    /// field the file does not set.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read { path: path.to_path_buf(), source: e })?;
        toml::from_str(&text).map_err(|e| ConfigError::Parse { path: path.to_path_buf(), source: e })
    }

    /// Load from `path` if it exists, otherwise the defaults — the shape a
    /// first-run `hashfleetd` invocation takes before an operator has ever
    /// written a config file.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
