// SPDX-License-Identifier: MIT

//! The event vocabulary fanned out by the Event Bus (C7).
//!
//! Kept as plain data here (no subscription/channel machinery — that lives
//! in `hf-engine::bus`) so both the storage and engine crates can construct
//! and pattern-match events without a dependency cycle.

use crate::agent::{AgentId, Capability, Status as AgentStatus};
use crate::job::{JobId, JobStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    AgentRegistered { agent_id: AgentId },
    AgentStatus { agent_id: AgentId, status: AgentStatus },
    AgentSpeed { agent_id: AgentId, speed_hps: u64 },
    AgentCapability { agent_id: AgentId, capability: Capability },
    JobCreated { job_id: JobId },
    JobProgress { job_id: JobId, progress: f64, speed_hps: u64, eta_epoch_ms: Option<u64> },
    JobStatus { job_id: JobId, status: JobStatus },
    /// Synthetic marker a subscriber receives in place of messages it missed
    /// because its bounded queue overflowed and a slow subscriber fell too
    /// far behind.
    Dropped { count: u64 },
}

impl Event {
    /// The entity this event concerns, for the per-entity FIFO ordering
    /// guarantee — two events with the same key are never reordered
    /// relative to each other.
    pub fn entity_key(&self) -> Option<String> {
        match self {
            Event::AgentRegistered { agent_id }
            | Event::AgentStatus { agent_id, .. }
            | Event::AgentSpeed { agent_id, .. }
            | Event::AgentCapability { agent_id, .. } => Some(format!("agent:{agent_id}")),
            Event::JobCreated { job_id }
            | Event::JobProgress { job_id, .. }
            | Event::JobStatus { job_id, .. } => Some(format!("job:{job_id}")),
            Event::Dropped { .. } => None,
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
