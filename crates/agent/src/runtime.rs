// SPDX-License-Identifier: MIT

//! The agent runtime (C2): `init` resolves identity (capability probe, local
//! IP discovery, registration), then `run` spawns the three concurrent
//! background tasks that live for as long as the process does — heartbeat,
//! local-file watch, job poll-and-run — each racing a child of the same
//! [`CancellationToken`] so a shutdown signal unblocks all of them within one
//! tick of the slowest interval.
//!
//! Draining issues exactly one combined `agent_shutdown` update after every
//! task has returned. Spec §4.2 calls out a documented pitfall here: posting
//! a status-only update followed by a separate port-clearing update lets a
//! concurrent read observe the agent as offline with its old port still
//! attached, or vice versa. One combined call avoids that window entirely.

use crate::capability;
use crate::client::ControlPlaneClient;
use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::job_runner;
use crate::localip;
use hf_adapters::{scan_local_files, AgentPaths, CrackerProcess};
use hf_core::{AgentId, Clock, LocalFile};
use hf_wire::RegisterAgentRequest;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// What `init` resolves before any background task starts.
pub struct Registered {
    pub agent_id: AgentId,
    /// The port reported at registration time, carried forward so drain's
    /// combined shutdown update can restore it verbatim.
    pub port: Option<u16>,
}

pub struct AgentRuntime {
    client: Arc<dyn ControlPlaneClient>,
    cracker: Arc<dyn CrackerProcess>,
    clock: Arc<dyn Clock>,
    config: AgentConfig,
    paths: AgentPaths,
}

impl AgentRuntime {
    pub fn new(
        config: AgentConfig,
        client: Arc<dyn ControlPlaneClient>,
        cracker: Arc<dyn CrackerProcess>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let paths = AgentPaths::new(config.local_files_root.clone());
        Self { client, cracker, clock, config, paths }
    }

    /// init -> registered: probe capability, resolve the local IP, and
    /// register with the control plane. Every failure here is fatal — an
    /// agent with no resolved identity cannot usefully continue.
    pub async fn init(&self) -> Result<Registered, AgentError> {
        self.paths
            .ensure_dirs()
            .await
            .map_err(|e| AgentError::Fatal(format!("failed to prepare local file root: {e}")))?;

        let capability = capability::probe(self.cracker.as_ref()).await;
        let address = localip::resolve_local_ip(self.config.address.as_deref())?;

        info!(
            agent_key = %self.config.agent_key,
            address = %address,
            capability = %capability,
            "registering with control plane"
        );

        let (agent, created) = self
            .client
            .register(RegisterAgentRequest {
                agent_key: self.config.agent_key.clone(),
                name: self.config.name.clone(),
                ip: Some(address),
                port: self.config.port,
                capability: Some(capability.as_str().to_string()),
            })
            .await
            .map_err(|e| AgentError::Fatal(format!("registration failed: {e}")))?;

        if created {
            info!(agent_id = %agent.id, "registered as a new agent");
        } else {
            info!(agent_id = %agent.id, "re-registered an existing agent");
        }
        Ok(Registered { agent_id: agent.id, port: agent.port })
    }

    /// registered -> running -> draining -> exited: run until `cancel` fires,
    /// then drain and post the single combined shutdown update.
    pub async fn run(self: Arc<Self>, registered: Registered, cancel: CancellationToken) {
        let heartbeat = tokio::spawn({
            let this = self.clone();
            let cancel = cancel.child_token();
            async move { this.heartbeat_loop(cancel).await }
        });
        let watch = tokio::spawn({
            let this = self.clone();
            let agent_id = registered.agent_id;
            let cancel = cancel.child_token();
            async move { this.local_file_watch_loop(agent_id, cancel).await }
        });
        let poll = tokio::spawn({
            let this = self.clone();
            let agent_id = registered.agent_id;
            let cancel = cancel.child_token();
            async move { this.job_poll_loop(agent_id, cancel).await }
        });

        cancel.cancelled().await;
        info!("draining: waiting for background tasks to observe cancellation");
        for handle in [heartbeat, watch, poll] {
            if let Err(e) = handle.await {
                warn!(error = %e, "background task panicked during drain");
            }
        }

        if let Err(e) = self.client.agent_shutdown(registered.agent_id, registered.port).await {
            warn!(error = %e, "failed to post shutdown status update");
        }
    }

    async fn heartbeat_loop(&self, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(self.config.intervals.heartbeat()) => {
                    if let Err(e) = self.client.heartbeat(&self.config.agent_key).await {
                        warn!(error = %e, "heartbeat failed");
                    }
                }
            }
        }
    }

    /// Rescans the local upload cache and resyncs with the control plane
    /// only when the set of locally-held files actually changed cardinality
    /// — a quiet cache doesn't need to repeat an identical sync every tick.
    async fn local_file_watch_loop(&self, agent_id: AgentId, cancel: CancellationToken) {
        let mut last_advertised_count = usize::MAX;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(self.config.intervals.local_file_watch()) => {
                    match self.scan_local_files(agent_id).await {
                        Ok(files) => {
                            if files.len() != last_advertised_count {
                                last_advertised_count = files.len();
                                self.client.sync_local_files(agent_id, files).await;
                            }
                        }
                        Err(e) => warn!(error = %e, "local file scan failed"),
                    }
                }
            }
        }
    }

    async fn scan_local_files(&self, agent_id: AgentId) -> Result<Vec<LocalFile>, AgentError> {
        let mut files =
            scan_local_files(agent_id, &self.paths.wordlists_dir(), hf_core::ArtifactKind::Wordlist).await?;
        files.extend(scan_local_files(agent_id, &self.paths.hash_files_dir(), hf_core::ArtifactKind::HashFile).await?);
        Ok(files)
    }

    /// Poll for an assigned job and, if one exists, run it to completion
    /// before polling again — structurally enforcing at most one job at a
    /// time with no separate busy flag to keep in sync.
    async fn job_poll_loop(&self, agent_id: AgentId, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(self.config.intervals.job_poll()) => {
                    match self.client.get_next_job(agent_id).await {
                        Ok(Some(job)) => {
                            info!(job_id = %job.id, "starting assigned job");
                            let outcome = job_runner::run_job(
                                self.client.as_ref(),
                                self.cracker.as_ref(),
                                &self.clock,
                                &self.paths,
                                agent_id,
                                self.config.workload,
                                self.config.intervals.job_watchdog(),
                                self.config.intervals.large_download_threshold_bytes,
                                cancel.child_token(),
                                &job,
                            )
                            .await;
                            if let Err(e) = outcome {
                                warn!(job_id = %job.id, error = %e, "job execution ended with an error");
                            }
                        }
                        Ok(None) => {}
                        Err(e) => warn!(error = %e, "job poll failed"),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
