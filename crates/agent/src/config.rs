// SPDX-License-Identifier: MIT

//! Agent configuration: a TOML file on disk, with every loop interval
//! exposed as a field per spec §9's "these values should be configurable"
//! note — none of them are hard-coded into the task loops themselves.

use hf_daemon::HealthMonitorSection;
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
    #[error("agent_key is required and cannot be empty")]
    MissingAgentKey,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntervalsSection {
    pub heartbeat_ms: u64,
    pub local_file_watch_ms: u64,
    pub job_poll_ms: u64,
    pub job_watchdog_ms: u64,
    /// Threshold above which an artifact download logs periodic progress
    /// rather than completing silently (spec §4.2 step 1).
    pub large_download_threshold_bytes: u64,
}

impl Default for IntervalsSection {
    fn default() -> Self {
        Self {
            heartbeat_ms: 1_000,
            local_file_watch_ms: 5 * 60 * 1_000,
            job_poll_ms: 5_000,
            job_watchdog_ms: 5_000,
            large_download_threshold_bytes: 10 * 1024 * 1024,
        }
    }
}

impl IntervalsSection {
    pub fn heartbeat(&self) -> Duration {
        Duration::from_millis(self.heartbeat_ms)
    }

    pub fn local_file_watch(&self) -> Duration {
        Duration::from_millis(self.local_file_watch_ms)
    }

    pub fn job_poll(&self) -> Duration {
        Duration::from_millis(self.job_poll_ms)
    }

    pub fn job_watchdog(&self) -> Duration {
        Duration::from_millis(self.job_watchdog_ms)
    }
}

/// Configuration for the embedded control plane this binary stands up in
/// place of the transport layer this workspace does not implement — see
/// `client::InProcessClient`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlPlaneSection {
    pub upload_root: PathBuf,
    pub health_monitor: HealthMonitorSection,
}

impl Default for ControlPlaneSection {
    fn default() -> Self {
        let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")).join("hashfleet");
        Self { upload_root: base.join("uploads"), health_monitor: HealthMonitorSection::default() }
    }
}

/// Resolved agent configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Mandatory; a missing or empty key is a fatal init error.
    pub agent_key: String,
    pub name: String,
    pub address: Option<String>,
    pub port: Option<u16>,
    pub cracker_binary_path: PathBuf,
    /// Local cache root scanned by the local-file watch loop and used as
    /// the localization target for downloaded artifacts.
    pub local_files_root: PathBuf,
    /// Hashcat `-w` workload profile (1 = low, through 4 = nightmare).
    pub workload: u8,
    pub intervals: IntervalsSection,
    pub control_plane: ControlPlaneSection,
}

impl Default for AgentConfig {
    fn default() -> Self {
        let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")).join("hashfleet-agent");
        Self {
            agent_key: String::new(),
            name: String::new(),
            address: None,
            port: None,
            cracker_binary_path: PathBuf::from("hashcat"),
            local_files_root: base.join("local-files"),
            workload: 2,
            intervals: IntervalsSection::default(),
            control_plane: ControlPlaneSection::default(),
        }
    }
}

impl AgentConfig {
    /// Load from a TOML file at `path`, falling back to defaults for any
    /// field the file does not set, then validate the fields init requires.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read { path: path.to_path_buf(), source: e })?;
        let config: Self = toml::from_str(&text).map_err(|e| ConfigError::Parse { path: path.to_path_buf(), source: e })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            let config = Self::default();
            config.validate()?;
            Ok(config)
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.agent_key.trim().is_empty() {
            return Err(ConfigError::MissingAgentKey);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
