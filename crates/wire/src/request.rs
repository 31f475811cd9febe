// SPDX-License-Identifier: MIT

//! Request bodies, one variant per control-plane operation.

use hf_core::{AgentId, JobId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterAgentRequest {
    pub agent_key: String,
    pub name: String,
    pub ip: Option<String>,
    pub port: Option<u16>,
    pub capability: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartbeatRequest {
    pub agent_key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StatusUpdateRequest {
    pub status: hf_core::AgentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedUpdateRequest {
    pub speed_hps: u64,
    pub status: Option<hf_core::AgentStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobProgressRequest {
    pub progress: f64,
    pub speed_hps: u64,
    pub eta_epoch_ms: Option<u64>,
    pub agent_id: AgentId,
    pub attack_mode: i64,
    pub rules: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompleteJobRequest {
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailJobRequest {
    pub reason: String,
}

/// A single typed envelope over every control-plane operation, for
/// callers (e.g. `hf-cli`) that want to address an operation by value
/// rather than calling the matching `ControlPlane` method directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    RegisterAgent(RegisterAgentRequest),
    Heartbeat(HeartbeatRequest),
    UpdateStatus { agent_id: AgentId, body: StatusUpdateRequest },
    UpdateSpeed { agent_id: AgentId, body: SpeedUpdateRequest },
    GetNextJob { agent_id: AgentId },
    JobProgress { job_id: JobId, body: JobProgressRequest },
    CompleteJob { job_id: JobId, body: CompleteJobRequest },
    FailJob { job_id: JobId, body: FailJobRequest },
    DownloadWordlist { artifact_id: hf_core::ArtifactId },
    DownloadHashFile { artifact_id: hf_core::ArtifactId },
}
