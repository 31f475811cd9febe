// SPDX-License-Identifier: MIT

//! Health Monitor (C4): the periodic sweep that demotes silent agents to
//! `offline` and fails any job they were running.
//!
//! The sweep never aborts a tick on a single agent's error — a transient
//! failure there is logged and the agent is left in its prior state; the
//! next tick will eventually observe the truth.

use hf_core::{Agent, AgentId, AgentStatus, Clock, Event, JobStatus};
use hf_storage::{AgentRegistry, JobStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Tunables, loaded from the daemon's config rather than hard-coded.
#[derive(Debug, Clone, Copy)]
pub struct HealthMonitorConfig {
    pub check_interval: Duration,
    pub agent_timeout: Duration,
    pub heartbeat_grace: Duration,
    pub max_concurrent_checks: usize,
}

impl Default for HealthMonitorConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(1),
            agent_timeout: Duration::from_secs(5),
            heartbeat_grace: Duration::from_secs(2),
            max_concurrent_checks: 20,
        }
    }
}

pub struct HealthMonitor {
    registry: Arc<AgentRegistry>,
    job_store: Arc<JobStore>,
    clock: Arc<dyn Clock>,
    config: HealthMonitorConfig,
}

impl HealthMonitor {
    pub fn new(
        registry: Arc<AgentRegistry>,
        job_store: Arc<JobStore>,
        clock: Arc<dyn Clock>,
        config: HealthMonitorConfig,
    ) -> Self {
        Self { registry, job_store, clock, config }
    }

    /// True once `agent` has been silent long enough to demote, or never had
    /// an address at all — an agent without an IP address is treated as
    /// offline regardless of heartbeat.
    fn is_stale(&self, agent: &Agent, now_epoch_ms: u64) -> bool {
        if agent.address.is_none() {
            return true;
        }
        let threshold_ms = (self.config.agent_timeout + self.config.heartbeat_grace).as_millis() as u64;
        match agent.last_heartbeat_epoch_ms {
            Some(last) => now_epoch_ms.saturating_sub(last) > threshold_ms,
            None => true,
        }
    }

    /// Demote one stale agent and fail any job it was running. Returns the
    /// events produced, in `agent_status` then `job_status` order.
    fn demote(&self, agent_id: AgentId) -> Vec<Event> {
        let mut events = Vec::new();
        match self.registry.update_status(agent_id, AgentStatus::Offline) {
            Ok(status_events) => events.extend(status_events),
            Err(e) => {
                warn!(agent_id = %agent_id, error = %e, "health monitor: failed to demote agent");
                return events;
            }
        }
        for job in self.job_store.list_all() {
            if job.assigned_agent == Some(agent_id) && job.status == JobStatus::Running {
                match self.job_store.fail_due_to_offline_agent(job.id) {
                    Ok(job_events) => events.extend(job_events),
                    Err(e) => warn!(job_id = %job.id, error = %e, "health monitor: failed to fail orphaned job"),
                }
            }
        }
        events
    }

    /// One sweep: list every agent, check each against the staleness
    /// threshold, and demote the ones that have gone quiet. Checks run
    /// concurrently, bounded by `max_concurrent_checks`.
    pub async fn sweep(&self) -> Vec<Event> {
        let now = self.clock.epoch_ms();
        let agents = self.registry.list_all();
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_checks.max(1)));

        let mut handles = Vec::with_capacity(agents.len());
        for agent in agents {
            if agent.status == AgentStatus::Offline || !self.is_stale(&agent, now) {
                continue;
            }
            let semaphore = semaphore.clone();
            let agent_id = agent.id;
            handles.push(async move {
                // `semaphore` is owned by this sweep and never explicitly closed.
                #[allow(clippy::expect_used)]
                let _permit = semaphore.acquire().await.expect("semaphore never closed");
                agent_id
            });
        }

        let mut events = Vec::new();
        for agent_id in futures_util::future::join_all(handles).await {
            events.extend(self.demote(agent_id));
        }
        events
    }

    /// Run the sweep loop until `cancel` fires — one of the control plane's
    /// cooperative background tasks.
    pub async fn run(&self, bus: &super::EventBus, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(self.config.check_interval) => {
                    let events = self.sweep().await;
                    bus.publish_all(events);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
