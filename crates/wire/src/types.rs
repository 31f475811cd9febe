// SPDX-License-Identifier: MIT

//! Wire-shaped DTOs: deliberately distinct from the `hf-core` domain types
//! so the JSON shape at the boundary can diverge from internal bookkeeping
//! fields (e.g. storage-only timestamps) without either side needing to
//! change in lockstep.

use hf_core::{
    Agent, AgentId, AgentStatus, Artifact, ArtifactId, ArtifactKind, Job, JobId, JobStatus, SkipLimit, WordlistRef,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDto {
    pub id: AgentId,
    pub name: String,
    pub address: Option<String>,
    pub port: Option<u16>,
    pub capability: Option<String>,
    pub speed_hps: u64,
    pub status: AgentStatus,
}

impl From<&Agent> for AgentDto {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id,
            name: agent.name.clone(),
            address: agent.address.clone(),
            port: agent.port,
            capability: agent.capability.as_ref().map(|c| c.as_str().to_string()),
            speed_hps: agent.speed_hps,
            status: agent.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDto {
    pub id: JobId,
    pub name: String,
    pub hash_file: ArtifactId,
    pub wordlist: WordlistRef,
    pub hash_type: i64,
    pub attack_mode: i64,
    pub rules: Option<String>,
    pub range: Option<SkipLimit>,
    pub status: JobStatus,
    pub progress: f64,
    pub speed_hps: u64,
    pub eta_epoch_ms: Option<u64>,
    pub assigned_agent: Option<AgentId>,
    pub result: Option<String>,
    pub failure_reason: Option<String>,
}

impl From<&Job> for JobDto {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id,
            name: job.name.clone(),
            hash_file: job.hash_file,
            wordlist: job.wordlist.clone(),
            hash_type: job.hash_type,
            attack_mode: job.attack_mode,
            rules: job.rules.clone(),
            range: job.range,
            status: job.status,
            progress: job.progress,
            speed_hps: job.speed_hps,
            eta_epoch_ms: job.eta_epoch_ms,
            assigned_agent: job.assigned_agent,
            result: job.result.clone(),
            failure_reason: job.failure_reason.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactDto {
    pub id: ArtifactId,
    pub kind: ArtifactKind,
    pub name: String,
    pub size_bytes: u64,
    pub line_count: Option<u64>,
}

impl From<&Artifact> for ArtifactDto {
    fn from(artifact: &Artifact) -> Self {
        Self {
            id: artifact.id,
            kind: artifact.kind,
            name: artifact.name.clone(),
            size_bytes: artifact.size_bytes,
            line_count: artifact.line_count,
        }
    }
}
