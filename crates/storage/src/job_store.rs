// SPDX-License-Identifier: MIT

//! Job Store (C5): the job lifecycle state machine encoded as an explicit
//! `transition` function, plus the persisted table and the single
//! `apply_progress` merge point that enforces both the terminal-state
//! rejection and the monotonic-progress invariant in one place.

use hf_core::{AgentId, Clock, Event, Job, JobId, JobStatus, JobStoreError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Who is driving a transition — mirrors the "actor" column of the job
/// lifecycle's transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Operator,
    Scheduler,
    Agent,
}

/// What the actor is asking to happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobEvent {
    Cancel,
    Assign,
    Start,
    Complete,
    Fail,
    Pause,
    Resume,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionError {
    pub from: JobStatus,
    pub actor: Actor,
    pub event: JobEvent,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} may not {:?} a job in {}", self.actor, self.event, self.from)
    }
}

/// The job lifecycle transition table as an exhaustive match. Every cell the
/// table does not name falls through to the catch-all and is rejected.
pub fn transition(from: JobStatus, actor: Actor, event: JobEvent) -> Result<JobStatus, TransitionError> {
    use JobStatus::*;
    let to = match (from, actor, event) {
        (Pending, Actor::Operator, JobEvent::Cancel) => Cancelled,
        (Pending, Actor::Scheduler, JobEvent::Assign) => Pending,
        (Pending, Actor::Agent, JobEvent::Start) => Running,
        (Running, Actor::Agent, JobEvent::Complete) => Completed,
        (Running, Actor::Agent, JobEvent::Fail) => Failed,
        (Running, Actor::Operator, JobEvent::Pause) => Paused,
        (Running, Actor::Operator, JobEvent::Cancel) => Cancelled,
        (Paused, Actor::Operator, JobEvent::Resume) => Pending,
        _ => return Err(TransitionError { from, actor, event }),
    };
    Ok(to)
}

pub struct JobStore {
    clock: Arc<dyn Clock>,
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl JobStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock, jobs: RwLock::new(HashMap::new()) }
    }

    pub fn create(&self, job: Job) -> Event {
        let job_id = job.id;
        self.jobs.write().insert(job_id, job);
        Event::JobCreated { job_id }
    }

    pub fn get(&self, id: JobId) -> Result<Job, JobStoreError> {
        self.jobs.read().get(&id).cloned().ok_or(JobStoreError::NotFound(id))
    }

    pub fn list_all(&self) -> Vec<Job> {
        self.jobs.read().values().cloned().collect()
    }

    /// Pending jobs ordered oldest-first (tie-break id ascending), the order
    /// the single-agent assignment mode picks from.
    pub fn list_pending(&self) -> Vec<Job> {
        let mut jobs: Vec<Job> =
            self.jobs.read().values().filter(|j| j.status == JobStatus::Pending).cloned().collect();
        jobs.sort_by(|a, b| a.created_at_epoch_ms.cmp(&b.created_at_epoch_ms).then(a.id.as_str().cmp(b.id.as_str())));
        jobs
    }

    fn write_transition(
        &self,
        id: JobId,
        actor: Actor,
        event: JobEvent,
        mutate: impl FnOnce(&mut Job, u64),
    ) -> Result<Vec<Event>, JobStoreError> {
        let now = self.clock.epoch_ms();
        let mut jobs = self.jobs.write();
        let job = jobs.get_mut(&id).ok_or(JobStoreError::NotFound(id))?;
        let to = transition(job.status, actor, event).map_err(|e| JobStoreError::IllegalTransition {
            job_id: id,
            from: e.from.to_string(),
            to: format!("{:?}:{:?}", e.actor, e.event),
        })?;
        job.status = to;
        mutate(job, now);
        Ok(vec![Event::JobStatus { job_id: id, status: to }])
    }

    /// Scheduler assigns an agent without changing status (still pending
    /// until the agent polls and starts it).
    pub fn assign(&self, id: JobId, agent_id: AgentId) -> Result<(), JobStoreError> {
        let mut jobs = self.jobs.write();
        let job = jobs.get_mut(&id).ok_or(JobStoreError::NotFound(id))?;
        transition(job.status, Actor::Scheduler, JobEvent::Assign).map_err(|e| JobStoreError::IllegalTransition {
            job_id: id,
            from: e.from.to_string(),
            to: format!("{:?}:{:?}", e.actor, e.event),
        })?;
        job.assigned_agent = Some(agent_id);
        Ok(())
    }

    pub fn start(&self, id: JobId) -> Result<Vec<Event>, JobStoreError> {
        self.write_transition(id, Actor::Agent, JobEvent::Start, |job, now| {
            job.started_at_epoch_ms = Some(now);
            job.progress = 0.0;
        })
    }

    pub fn complete(&self, id: JobId, result: String) -> Result<Vec<Event>, JobStoreError> {
        self.write_transition(id, Actor::Agent, JobEvent::Complete, |job, now| {
            job.result = Some(result);
            job.progress = 100.0;
            job.completed_at_epoch_ms = Some(now);
        })
    }

    pub fn fail(&self, id: JobId, reason: String) -> Result<Vec<Event>, JobStoreError> {
        self.write_transition(id, Actor::Agent, JobEvent::Fail, |job, now| {
            job.failure_reason = Some(reason);
            job.completed_at_epoch_ms = Some(now);
        })
    }

    /// Used by the Health Monitor (C4) when it observes a running agent go
    /// offline — the job is failed with a fixed reason, not by the agent.
    pub fn fail_due_to_offline_agent(&self, id: JobId) -> Result<Vec<Event>, JobStoreError> {
        self.fail(id, "agent offline".to_string())
    }

    pub fn pause(&self, id: JobId) -> Result<Vec<Event>, JobStoreError> {
        self.write_transition(id, Actor::Operator, JobEvent::Pause, |_, _| {})
    }

    pub fn cancel(&self, id: JobId) -> Result<Vec<Event>, JobStoreError> {
        let now = self.clock.epoch_ms();
        let mut jobs = self.jobs.write();
        let job = jobs.get_mut(&id).ok_or(JobStoreError::NotFound(id))?;
        let to = transition(job.status, Actor::Operator, JobEvent::Cancel).map_err(|e| {
            JobStoreError::IllegalTransition {
                job_id: id,
                from: e.from.to_string(),
                to: format!("{:?}:{:?}", e.actor, e.event),
            }
        })?;
        job.status = to;
        job.completed_at_epoch_ms = Some(now);
        Ok(vec![Event::JobStatus { job_id: id, status: to }])
    }

    pub fn resume(&self, id: JobId) -> Result<Vec<Event>, JobStoreError> {
        self.write_transition(id, Actor::Operator, JobEvent::Resume, |_, _| {})
    }

    /// The single merge point for progress pushes: rejects terminal-state
    /// updates and never lets progress regress.
    pub fn apply_progress(
        &self,
        id: JobId,
        progress: f64,
        speed_hps: u64,
        eta_epoch_ms: Option<u64>,
    ) -> Result<Vec<Event>, JobStoreError> {
        let mut jobs = self.jobs.write();
        let job = jobs.get_mut(&id).ok_or(JobStoreError::NotFound(id))?;
        if job.status.is_terminal() {
            return Err(JobStoreError::TerminalState(id));
        }
        job.progress = job.progress.max(progress);
        job.speed_hps = speed_hps;
        job.eta_epoch_ms = eta_epoch_ms;
        Ok(vec![Event::JobProgress { job_id: id, progress: job.progress, speed_hps, eta_epoch_ms }])
    }
}

#[cfg(test)]
#[path = "job_store_tests.rs"]
mod tests;
