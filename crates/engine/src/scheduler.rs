// SPDX-License-Identifier: MIT

//! Scheduler / Partitioner (C6): single-agent assignment and distributed
//! wordlist partitioning. The proportional-share math itself lives in
//! [`crate::partition`] as pure functions; this module is the stateful half
//! that reads the Registry/Job Store/Catalog and writes sibling Jobs.

use crate::error::EngineError;
use crate::partition::{order_by_weight, ranges};
use hf_adapters::ArtifactFileStore;
use hf_core::{Agent, AgentId, ArtifactId, ArtifactKind, Clock, Event, Job, JobId, JobStatus, WordlistRef};
use hf_storage::{ArtifactCatalog, AgentRegistry, JobStore};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub struct Scheduler {
    registry: Arc<AgentRegistry>,
    job_store: Arc<JobStore>,
    catalog: Arc<ArtifactCatalog>,
    file_store: Arc<ArtifactFileStore>,
    clock: Arc<dyn Clock>,
}

impl Scheduler {
    pub fn new(
        registry: Arc<AgentRegistry>,
        job_store: Arc<JobStore>,
        catalog: Arc<ArtifactCatalog>,
        file_store: Arc<ArtifactFileStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { registry, job_store, catalog, file_store, clock }
    }

    fn agent_is_busy(&self, agent_id: AgentId) -> bool {
        self.job_store
            .list_all()
            .iter()
            .any(|job| job.assigned_agent == Some(agent_id) && job.status == JobStatus::Running)
    }

    fn eligible_idle_agents(&self) -> Vec<Agent> {
        self.registry.list_all().into_iter().filter(|a| a.eligible() && !self.agent_is_busy(a.id)).collect()
    }

    /// Single-agent assignment mode: pair the oldest unassigned pending Job
    /// with the fastest idle eligible agent. Leaves
    /// the Job's status at `pending` — the agent picks it up on its next
    /// poll. Returns `None` (not an error) when there is nothing to pair:
    /// no unassigned pending job, or no eligible idle agent.
    pub fn assign_single(&self) -> Result<Option<JobId>, EngineError> {
        let Some(job) = self.job_store.list_pending().into_iter().find(|j| j.assigned_agent.is_none()) else {
            return Ok(None);
        };
        let mut idle = self.eligible_idle_agents();
        if idle.is_empty() {
            return Ok(None);
        }
        idle.sort_by(|a, b| b.speed_hps.cmp(&a.speed_hps).then_with(|| a.id.cmp(&b.id)));
        let agent = &idle[0];
        self.job_store.assign(job.id, agent.id)?;
        Ok(Some(job.id))
    }

    /// Distributed partitioning: split `wordlist` across `agent_ids`
    /// proportional to their measured speed, materializing
    /// one sibling Job per agent. Every agent in `agent_ids` must already be
    /// eligible (online, idle, capability known) — the scheduler never
    /// preempts a running job to re-distribute.
    pub async fn distribute(
        &self,
        name: &str,
        hash_file: ArtifactId,
        wordlist: ArtifactId,
        hash_type: i64,
        attack_mode: i64,
        rules: Option<String>,
        agent_ids: &[AgentId],
    ) -> Result<Vec<Event>, EngineError> {
        let mut agents = Vec::with_capacity(agent_ids.len());
        for &id in agent_ids {
            let agent = self.registry.get(id)?;
            if !agent.eligible() || self.agent_is_busy(id) {
                return Err(EngineError::AgentNotEligible(id));
            }
            agents.push(agent);
        }

        let wordlist_len = self.wordlist_len(wordlist).await?;
        let ordered = order_by_weight(agents);
        let plan = ranges(wordlist_len, &ordered);

        let mut events = Vec::with_capacity(plan.len());
        if wordlist_len == 0 {
            // An empty wordlist has nothing to assign; this creates no
            // sibling jobs at all rather than zero-limit placeholders (see
            // DESIGN.md).
            return Ok(events);
        }
        let now = self.clock.epoch_ms();
        for (agent_id, range) in plan {
            let mut job = Job::new(name, hash_file, WordlistRef::Catalog(wordlist), hash_type, attack_mode, now);
            job.rules = rules.clone();
            job.range = Some(range);
            let job_id = job.id;
            events.push(self.job_store.create(job));
            self.job_store.assign(job_id, agent_id)?;
        }
        Ok(events)
    }

    /// Wordlist line count, computing it with a single streaming pass over
    /// the file store when the catalog hasn't cached it yet.
    async fn wordlist_len(&self, wordlist: ArtifactId) -> Result<u64, EngineError> {
        let artifact = self.catalog.get_meta(wordlist)?;
        if let Some(len) = artifact.line_count {
            return Ok(len);
        }
        let len = self
            .file_store
            .count_lines(ArtifactKind::Wordlist, &artifact.content_hash)
            .await
            .map_err(|_| EngineError::UnknownWordlistLength(wordlist))?;
        self.catalog.set_line_count(wordlist, len)?;
        Ok(len)
    }

    /// Run `assign_single` on a fixed tick until `cancel` fires — the
    /// background task that pairs single-agent Jobs as soon as an agent goes
    /// idle, rather than waiting for a poll to trigger it. Assignment errors
    /// are logged, not fatal: the next tick retries.
    pub async fn run_auto_assign(&self, interval: Duration, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(interval) => {
                    if let Err(e) = self.assign_single() {
                        tracing::warn!(error = %e, "scheduler: auto-assign tick failed");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
