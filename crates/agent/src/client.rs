// SPDX-License-Identifier: MIT

//! The agent's only view of the control plane. [`ControlPlaneClient`] is the
//! seam an HTTP/WS transport would implement against `hf-wire`'s request and
//! response bodies; since no such transport exists anywhere in this
//! workspace, [`InProcessClient`] is the only implementation, wrapping an
//! `Arc<hf_daemon::ControlPlane>` directly. Every other agent module talks
//! to `dyn ControlPlaneClient`, never to `ControlPlane` or `InProcessClient`
//! by name, so a future transport-backed client is a drop-in replacement.

use async_trait::async_trait;
use hf_core::{AgentId, Artifact, ArtifactId, ArtifactKind, JobId, LocalFile};
use hf_daemon::ControlPlane;
use hf_wire::{
    AgentDto, CompleteJobRequest, FailJobRequest, JobDto, JobProgressRequest, RegisterAgentRequest, SpeedUpdateRequest,
    WireError,
};
use std::sync::Arc;
use tokio::fs::File;

#[async_trait]
pub trait ControlPlaneClient: Send + Sync {
    async fn register(&self, request: RegisterAgentRequest) -> Result<(AgentDto, bool), WireError>;
    async fn heartbeat(&self, agent_key: &str) -> Result<(), WireError>;
    async fn update_speed(&self, agent_id: AgentId, body: SpeedUpdateRequest) -> Result<(), WireError>;
    async fn get_next_job(&self, agent_id: AgentId) -> Result<Option<JobDto>, WireError>;
    async fn get_job(&self, job_id: JobId) -> Result<JobDto, WireError>;
    async fn job_progress(&self, job_id: JobId, body: JobProgressRequest) -> Result<(), WireError>;
    async fn complete_job(&self, job_id: JobId, body: CompleteJobRequest) -> Result<JobDto, WireError>;
    async fn fail_job(&self, job_id: JobId, body: FailJobRequest) -> Result<JobDto, WireError>;
    async fn download_wordlist(&self, id: ArtifactId) -> Result<(Artifact, File), WireError>;
    async fn download_hash_file(&self, id: ArtifactId) -> Result<(Artifact, File), WireError>;
    async fn sync_local_files(&self, agent_id: AgentId, files: Vec<LocalFile>) -> bool;
    async fn local_files_for(&self, agent_id: AgentId) -> Vec<LocalFile>;
    /// The agent's single combined shutdown update — see
    /// `hf_daemon::ControlPlane::agent_shutdown`.
    async fn agent_shutdown(&self, agent_id: AgentId, port: Option<u16>) -> Result<(), WireError>;
}

pub struct InProcessClient {
    control_plane: Arc<ControlPlane>,
}

impl InProcessClient {
    pub fn new(control_plane: Arc<ControlPlane>) -> Self {
        Self { control_plane }
    }

    /// Escape hatch to the embedded control plane for operations with no
    /// `ControlPlaneClient` counterpart (e.g. `hf-cli`'s operator-facing
    /// calls, or seeding fixtures in tests).
    pub fn control_plane(&self) -> &ControlPlane {
        &self.control_plane
    }
}

#[async_trait]
impl ControlPlaneClient for InProcessClient {
    async fn register(&self, request: RegisterAgentRequest) -> Result<(AgentDto, bool), WireError> {
        self.control_plane.register_agent(request)
    }

    async fn heartbeat(&self, agent_key: &str) -> Result<(), WireError> {
        self.control_plane.heartbeat(agent_key)
    }

    async fn update_speed(&self, agent_id: AgentId, body: SpeedUpdateRequest) -> Result<(), WireError> {
        self.control_plane.update_speed(agent_id, body)
    }

    async fn get_next_job(&self, agent_id: AgentId) -> Result<Option<JobDto>, WireError> {
        self.control_plane.get_next_job(agent_id)
    }

    async fn get_job(&self, job_id: JobId) -> Result<JobDto, WireError> {
        self.control_plane.get_job(job_id)
    }

    async fn job_progress(&self, job_id: JobId, body: JobProgressRequest) -> Result<(), WireError> {
        self.control_plane.job_progress(job_id, body)
    }

    async fn complete_job(&self, job_id: JobId, body: CompleteJobRequest) -> Result<JobDto, WireError> {
        self.control_plane.complete_job(job_id, body)
    }

    async fn fail_job(&self, job_id: JobId, body: FailJobRequest) -> Result<JobDto, WireError> {
        self.control_plane.fail_job(job_id, body)
    }

    async fn download_wordlist(&self, id: ArtifactId) -> Result<(Artifact, File), WireError> {
        self.control_plane.open_artifact(ArtifactKind::Wordlist, id).await
    }

    async fn download_hash_file(&self, id: ArtifactId) -> Result<(Artifact, File), WireError> {
        self.control_plane.open_artifact(ArtifactKind::HashFile, id).await
    }

    async fn sync_local_files(&self, agent_id: AgentId, files: Vec<LocalFile>) -> bool {
        self.control_plane.sync_local_files(agent_id, files)
    }

    async fn local_files_for(&self, agent_id: AgentId) -> Vec<LocalFile> {
        self.control_plane.local_files_for(agent_id)
    }

    async fn agent_shutdown(&self, agent_id: AgentId, port: Option<u16>) -> Result<(), WireError> {
        self.control_plane.agent_shutdown(agent_id, port)
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
