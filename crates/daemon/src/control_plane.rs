// SPDX-License-Identifier: MIT

//! The control-plane service object: wires the Agent Registry (C3), Job
//! Store (C5), Artifact Catalog (C8), and the Scheduler/Health Monitor from
//! `hf-engine` behind one async method per [`hf_wire::Request`] variant,
//! plus the operator-facing operations (`hf-cli`) has no wire envelope for.
//!
//! No socket or framing code lives here — an HTTP layer grafted on later
//! would deserialize a `Request` from a body, call the matching method, and
//! serialize the `Response` back.

use hf_adapters::{AgentPaths, ArtifactFileStore};
use hf_core::{
    AgentId, AgentKey, AgentStatus, Artifact, ArtifactId, ArtifactKind, Capability, Clock, Event, Job, JobId,
    LocalFile, WordlistRef,
};
use hf_engine::{EventBus, HealthMonitor, HealthMonitorConfig, Scheduler};
use hf_storage::{AgentRegistry, ArtifactCatalog, JobStore, LocalFileIndex};
use hf_wire::{
    AgentDto, ArtifactDto, CompleteJobRequest, FailJobRequest, JobDto, JobProgressRequest, RegisterAgentRequest,
    Request, Response, SpeedUpdateRequest, WireError,
};
use std::sync::Arc;
use tokio::fs::File;

pub struct ControlPlane {
    registry: Arc<AgentRegistry>,
    job_store: Arc<JobStore>,
    catalog: Arc<ArtifactCatalog>,
    file_store: Arc<ArtifactFileStore>,
    scheduler: Scheduler,
    health_monitor: HealthMonitor,
    local_files: LocalFileIndex,
    bus: EventBus,
}

impl ControlPlane {
    pub fn new(upload_root: std::path::PathBuf, health_monitor_config: HealthMonitorConfig, clock: Arc<dyn Clock>) -> Self {
        let registry = Arc::new(AgentRegistry::new(clock.clone()));
        let job_store = Arc::new(JobStore::new(clock.clone()));
        let catalog = Arc::new(ArtifactCatalog::new());
        let file_store = Arc::new(ArtifactFileStore::new(AgentPaths::new(upload_root)));
        let scheduler = Scheduler::new(registry.clone(), job_store.clone(), catalog.clone(), file_store.clone(), clock.clone());
        let health_monitor = HealthMonitor::new(registry.clone(), job_store.clone(), clock, health_monitor_config);
        Self {
            registry,
            job_store,
            catalog,
            file_store,
            scheduler,
            health_monitor,
            local_files: LocalFileIndex::new(),
            bus: EventBus::new(),
        }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn health_monitor(&self) -> &HealthMonitor {
        &self.health_monitor
    }

    fn publish(&self, events: Vec<Event>) {
        self.bus.publish_all(events);
    }

    /// Dispatch a wire-level [`Request`] to the matching method, converting
    /// domain errors to [`WireError`] and wrapping the result in a
    /// [`Response`]. This is the seam an HTTP handler layer would call.
    pub async fn handle(&self, request: Request) -> Response {
        match request {
            Request::RegisterAgent(body) => match self.register_agent(body) {
                Ok((agent, created)) => {
                    if created {
                        Response::Created { agent }
                    } else {
                        Response::Updated { agent }
                    }
                }
                Err(error) => Response::Error { error },
            },
            Request::Heartbeat(body) => match self.heartbeat(&body.agent_key) {
                Ok(()) => Response::Accepted,
                Err(error) => Response::Error { error },
            },
            Request::UpdateStatus { agent_id, body } => match self.update_status(agent_id, body.status) {
                Ok(()) => Response::Accepted,
                Err(error) => Response::Error { error },
            },
            Request::UpdateSpeed { agent_id, body } => match self.update_speed(agent_id, body) {
                Ok(()) => Response::Accepted,
                Err(error) => Response::Error { error },
            },
            Request::GetNextJob { agent_id } => match self.get_next_job(agent_id) {
                Ok(job) => Response::NextJob { job },
                Err(error) => Response::Error { error },
            },
            Request::JobProgress { job_id, body } => match self.job_progress(job_id, body) {
                Ok(()) => Response::Accepted,
                Err(error) => Response::Error { error },
            },
            Request::CompleteJob { job_id, body } => match self.complete_job(job_id, body) {
                Ok(job) => Response::Job { job },
                Err(error) => Response::Error { error },
            },
            Request::FailJob { job_id, body } => match self.fail_job(job_id, body) {
                Ok(job) => Response::Job { job },
                Err(error) => Response::Error { error },
            },
            Request::DownloadWordlist { artifact_id } => match self.open_artifact(ArtifactKind::Wordlist, artifact_id).await {
                Ok((_artifact, _file)) => Response::Accepted,
                Err(error) => Response::Error { error },
            },
            Request::DownloadHashFile { artifact_id } => match self.open_artifact(ArtifactKind::HashFile, artifact_id).await {
                Ok((_artifact, _file)) => Response::Accepted,
                Err(error) => Response::Error { error },
            },
        }
    }

    /// Pre-provision an agent key ahead of a worker's first registration —
    /// an operator action with no wire envelope of its own.
    pub fn provision_agent(&self, key: AgentKey) -> AgentDto {
        AgentDto::from(&self.registry.provision(key))
    }

    pub fn register_agent(&self, body: RegisterAgentRequest) -> Result<(AgentDto, bool), WireError> {
        let key = AgentKey::new(body.agent_key);
        let existed = self.registry.lookup_by_key(&key).map(|a| !a.name.is_empty()).unwrap_or(false);
        let capability = body.capability.map(|c| Capability::classify(&c));
        let (agent, events) = self.registry.register(&key, body.name, body.ip, body.port, capability)?;
        self.publish(events);
        Ok((AgentDto::from(&agent), !existed))
    }

    pub fn heartbeat(&self, agent_key: &str) -> Result<(), WireError> {
        let events = self.registry.touch(&AgentKey::new(agent_key))?;
        self.publish(events);
        Ok(())
    }

    pub fn update_status(&self, agent_id: AgentId, status: AgentStatus) -> Result<(), WireError> {
        let events = self.registry.update_status(agent_id, status)?;
        self.publish(events);
        Ok(())
    }

    pub fn update_speed(&self, agent_id: AgentId, body: SpeedUpdateRequest) -> Result<(), WireError> {
        let mut events = self.registry.update_speed(agent_id, body.speed_hps)?;
        if let Some(status) = body.status {
            events.extend(self.registry.update_status(agent_id, status)?);
        }
        self.publish(events);
        Ok(())
    }

    /// Returns the agent's assigned pending Job, if any, and immediately
    /// starts it — a poll response doubles as the pending-to-running
    /// transition trigger since there is no separate "start" operation in
    /// the external contract.
    pub fn get_next_job(&self, agent_id: AgentId) -> Result<Option<JobDto>, WireError> {
        let Some(job) = self
            .job_store
            .list_all()
            .into_iter()
            .find(|j| j.assigned_agent == Some(agent_id) && j.status == hf_core::JobStatus::Pending)
        else {
            return Ok(None);
        };
        let events = self.job_store.start(job.id)?;
        self.publish(events);
        let started = self.job_store.get(job.id)?;
        Ok(Some(JobDto::from(&started)))
    }

    /// An idempotent merge into the Job alone (spec §6) — the agent's
    /// measured speed has its own dedicated endpoint (§4.1 `update_speed`)
    /// and must not be overwritten by a job's instantaneous speed, which is
    /// frequently 0 (the initial packet, or any progress line the parser
    /// couldn't extract a `Speed:` label from).
    pub fn job_progress(&self, job_id: JobId, body: JobProgressRequest) -> Result<(), WireError> {
        let events = self.job_store.apply_progress(job_id, body.progress, body.speed_hps, body.eta_epoch_ms)?;
        self.publish(events);
        Ok(())
    }

    pub fn complete_job(&self, job_id: JobId, body: CompleteJobRequest) -> Result<JobDto, WireError> {
        let events = self.job_store.complete(job_id, body.result)?;
        self.publish(events);
        Ok(JobDto::from(&self.job_store.get(job_id)?))
    }

    pub fn fail_job(&self, job_id: JobId, body: FailJobRequest) -> Result<JobDto, WireError> {
        let events = self.job_store.fail(job_id, body.reason)?;
        self.publish(events);
        Ok(JobDto::from(&self.job_store.get(job_id)?))
    }

    /// Open an artifact's bytes for streaming download — the seam
    /// `hf-agent`'s artifact resolution calls directly (and an HTTP
    /// download handler grafted on later would call to serve the response
    /// body). Also returns the artifact's metadata so the caller can
    /// compare content hash / line count without a second round trip.
    pub async fn open_artifact(&self, kind: ArtifactKind, id: ArtifactId) -> Result<(Artifact, File), WireError> {
        let artifact = self.catalog.get_meta(id)?;
        let file = self
            .file_store
            .open(kind, &artifact.content_hash)
            .await
            .map_err(|e| WireError::Transient { message: e.to_string() })?;
        Ok((artifact, file))
    }

    /// Resync the advisory AgentLocalFile set an agent has advertised.
    /// Returns whether the set's cardinality changed — the only thing the
    /// agent's watch loop needs to decide whether the resync was worth
    /// sending.
    pub fn sync_local_files(&self, agent_id: AgentId, files: Vec<LocalFile>) -> bool {
        self.local_files.sync(agent_id, files)
    }

    pub fn local_files_for(&self, agent_id: AgentId) -> Vec<LocalFile> {
        self.local_files.for_agent(agent_id)
    }

    /// The agent's single combined shutdown update (spec §4.2 "draining"):
    /// sets status offline and restores the pre-run port in one call,
    /// preserving measured capability and speed. Issuing these as two
    /// separate calls is the documented pitfall this method exists to
    /// avoid.
    pub fn agent_shutdown(&self, agent_id: AgentId, port: Option<u16>) -> Result<(), WireError> {
        let events = self.registry.update_status_and_port(agent_id, AgentStatus::Offline, port)?;
        self.publish(events);
        Ok(())
    }

    pub async fn upload_artifact(
        &self,
        kind: ArtifactKind,
        name: String,
        reader: impl tokio::io::AsyncRead + Unpin,
    ) -> Result<ArtifactDto, WireError> {
        let outcome =
            self.file_store.put_stream(kind, reader).await.map_err(|e| WireError::Transient { message: e.to_string() })?;
        let (id, _created) = self.catalog.put(kind, name, outcome.size_bytes, outcome.content_hash);
        Ok(ArtifactDto::from(&self.catalog.get_meta(id)?))
    }

    pub fn delete_artifact(&self, id: ArtifactId) -> Result<(), WireError> {
        let referenced = self
            .job_store
            .list_all()
            .iter()
            .any(|j| !j.status.is_terminal() && job_references(j, id));
        self.catalog.delete(id, referenced)?;
        Ok(())
    }

    pub fn list_agents(&self) -> Vec<AgentDto> {
        self.registry.list_all().iter().map(AgentDto::from).collect()
    }

    pub fn get_agent(&self, id: AgentId) -> Result<AgentDto, WireError> {
        Ok(AgentDto::from(&self.registry.get(id)?))
    }

    pub fn list_jobs(&self) -> Vec<JobDto> {
        self.job_store.list_all().iter().map(JobDto::from).collect()
    }

    pub fn get_job(&self, id: JobId) -> Result<JobDto, WireError> {
        Ok(JobDto::from(&self.job_store.get(id)?))
    }

    pub fn list_artifacts(&self, kind: ArtifactKind) -> Vec<ArtifactDto> {
        self.catalog.list(kind).iter().map(ArtifactDto::from).collect()
    }

    /// Create an un-assigned single-agent Job — the Scheduler's auto-assign
    /// tick (or an explicit `assign_single` call) pairs it with an idle
    /// agent afterward.
    pub fn create_job(
        &self,
        name: &str,
        hash_file: ArtifactId,
        wordlist: WordlistRef,
        hash_type: i64,
        attack_mode: i64,
        rules: Option<String>,
        now_epoch_ms: u64,
    ) -> JobDto {
        let mut job = Job::new(name, hash_file, wordlist, hash_type, attack_mode, now_epoch_ms);
        job.rules = rules;
        let dto = JobDto::from(&job);
        self.publish(vec![self.job_store.create(job)]);
        dto
    }

    pub async fn distribute_job(
        &self,
        name: &str,
        hash_file: ArtifactId,
        wordlist: ArtifactId,
        hash_type: i64,
        attack_mode: i64,
        rules: Option<String>,
        agent_ids: &[AgentId],
    ) -> Result<Vec<JobDto>, WireError> {
        let events = self
            .scheduler
            .distribute(name, hash_file, wordlist, hash_type, attack_mode, rules, agent_ids)
            .await
            .map_err(|e| WireError::InputInvalid { message: e.to_string() })?;
        self.publish(events.clone());
        let job_ids: Vec<JobId> = events
            .into_iter()
            .filter_map(|e| if let Event::JobCreated { job_id } = e { Some(job_id) } else { None })
            .collect();
        let mut jobs = Vec::with_capacity(job_ids.len());
        for id in job_ids {
            jobs.push(JobDto::from(&self.job_store.get(id)?));
        }
        Ok(jobs)
    }
}

fn job_references(job: &Job, artifact: ArtifactId) -> bool {
    job.hash_file == artifact || matches!(&job.wordlist, WordlistRef::Catalog(id) if *id == artifact)
}

#[cfg(test)]
#[path = "control_plane_tests.rs"]
mod tests;
