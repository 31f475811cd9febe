// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hf-engine: the control plane's stateful core sitting atop `hf-storage` —
//! the Scheduler/Partitioner (C6), the Health Monitor (C4), and the
//! real-time Event Bus (C7). `hf-daemon` wires this crate's types directly
//! to the control-plane operation table; this crate itself never touches a
//! socket.

pub mod bus;
pub mod error;
pub mod health;
pub mod partition;
pub mod scheduler;

pub use bus::{EventBus, EventStream};
pub use error::EngineError;
pub use health::{HealthMonitor, HealthMonitorConfig};
pub use scheduler::Scheduler;
