// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hf-agent: the worker-host runtime (C2). Owns the capability probe, local
//! IP discovery, and the five concurrent tasks described in the spec's
//! agent-runtime section — heartbeat, local-file watch, job poll, and (while
//! a job runs) the two output-stream consumers plus the status watchdog —
//! each racing a shared [`tokio_util::sync::CancellationToken`].
//!
//! No transport code lives here: [`client::ControlPlaneClient`] is the seam
//! an HTTP client would implement. Its only implementation today,
//! [`client::InProcessClient`], wraps an in-process `hf_daemon::ControlPlane`
//! directly, since no socket/framing layer exists anywhere in this
//! workspace — see `hf_daemon::control_plane` and DESIGN.md.

pub mod artifacts;
pub mod capability;
pub mod client;
pub mod config;
pub mod env;
pub mod error;
pub mod job_runner;
pub mod localip;
pub mod runtime;

pub use client::{ControlPlaneClient, InProcessClient};
pub use config::{AgentConfig, ConfigError, IntervalsSection};
pub use error::AgentError;
pub use runtime::AgentRuntime;
