// SPDX-License-Identifier: MIT

//! Agent identity and state types.
//!
//! [`AgentKey`] is the stable, pre-provisioned identity an operator hands to
//! a worker host before it ever talks to the control plane. [`AgentId`] is
//! the control-plane-assigned record identifier — distinct because a key is
//! immutable and opaque to the operator, while an id is an internal
//! bookkeeping handle (stable ordering, log correlation).

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

crate::define_id! {
    /// Control-plane-assigned identifier for an [`Agent`] record.
    pub struct AgentId("agt-");
}

/// Immutable, pre-provisioned identity of a worker host.
///
/// Unlike [`AgentId`], the key is chosen by the operator (not generated) and
/// never changes for the lifetime of the agent; renaming a key is not a
/// supported operation — destroy and re-provision instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentKey(pub String);

impl AgentKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AgentKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AgentKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Borrow<str> for AgentKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Coarse compute tag reported by an agent's capability probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capability {
    Cpu,
    Gpu,
    /// Vendor-qualified string, e.g. `"GTX 1080"` or `"RTX 4090"` — kept
    /// verbatim so the scheduler's fallback weight table can pattern-match
    /// on it (GTX-class vs RTX-class) without losing information.
    Vendor(String),
}

impl Capability {
    /// Parse a free-text device label into a capability tag, per the
    /// control-plane-side policy: case-insensitive "gpu" substring wins over
    /// "cpu"; anything else is kept as a vendor string so the scheduler can
    /// still try a vendor-specific weight lookup.
    pub fn classify(label: &str) -> Self {
        let lower = label.to_ascii_lowercase();
        if lower.contains("gpu") {
            Capability::Gpu
        } else if lower.contains("cpu") {
            Capability::Cpu
        } else {
            Capability::Vendor(label.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Capability::Cpu => "CPU",
            Capability::Gpu => "GPU",
            Capability::Vendor(s) => s.as_str(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Capability::Vendor(s) if s.is_empty())
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Agent liveness/availability status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Offline,
    Online,
    Busy,
}

crate::simple_display! {
    Status {
        Offline => "offline",
        Online => "online",
        Busy => "busy",
    }
}

/// Full agent record as tracked by the control plane (C3 Agent Registry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub key: AgentKey,
    pub name: String,
    pub address: Option<String>,
    pub port: Option<u16>,
    pub capability: Option<Capability>,
    pub speed_hps: u64,
    pub status: Status,
    pub last_heartbeat_epoch_ms: Option<u64>,
}

impl Agent {
    /// A newly-registered agent before any mutable fields are filled in.
    pub fn provisional(key: AgentKey) -> Self {
        Self {
            id: AgentId::new(),
            key,
            name: String::new(),
            address: None,
            port: None,
            capability: None,
            speed_hps: 0,
            status: Status::Offline,
            last_heartbeat_epoch_ms: None,
        }
    }

    /// Eligible for scheduling: online, not already busy, and capability known.
    pub fn eligible(&self) -> bool {
        self.status == Status::Online
            && self.capability.as_ref().is_some_and(|c| !c.is_empty())
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
