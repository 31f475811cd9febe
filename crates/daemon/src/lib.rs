// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hf-daemon: the control-plane process. Wires the Agent Registry, Job
//! Store, Artifact Catalog, Scheduler, and Health Monitor behind
//! [`ControlPlane`], and owns the two cooperative background tasks
//! (auto-assignment, health sweep) that keep state moving without a caller
//! having to drive them.

pub mod config;
pub mod control_plane;
pub mod env;

pub use config::{ConfigError, DaemonConfig, HealthMonitorSection};
pub use control_plane::ControlPlane;
// Re-exported so callers building a `ControlPlane` (hashfleetd's own
// main.rs, hf-agent's embedded client, hf-cli) don't need a direct
// hf-engine dependency just to name this one type.
pub use hf_engine::HealthMonitorConfig;
