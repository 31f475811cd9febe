// SPDX-License-Identifier: MIT

//! Job identifier, wordlist reference, and status types.

use crate::agent::AgentId;
use crate::artifact::ArtifactId;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a cracking job.
    pub struct JobId("job-");
}

/// Status of a [`Job`] (the lifecycle state machine's states).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Paused,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled)
    }
}

crate::simple_display! {
    JobStatus {
        Pending => "pending",
        Running => "running",
        Paused => "paused",
        Completed => "completed",
        Failed => "failed",
        Cancelled => "cancelled",
    }
}

/// The job's wordlist field is one of two distinct, typed variants rather
/// than a single string sniffed for newlines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WordlistRef {
    /// A wordlist artifact already present in the catalog.
    Catalog(ArtifactId),
    /// Wordlist content embedded directly in the job record; materialized
    /// by the agent as a temp file keyed by job id.
    Inline(String),
}

/// A contiguous, half-open `[skip, skip+limit)` slice of a wordlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipLimit {
    pub skip: u64,
    pub limit: u64,
}

impl SkipLimit {
    pub fn full(wordlist_len: u64) -> Self {
        Self { skip: 0, limit: wordlist_len }
    }

    pub fn end(&self) -> u64 {
        self.skip + self.limit
    }
}

/// One unit of cracking work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
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
    pub created_at_epoch_ms: u64,
    pub started_at_epoch_ms: Option<u64>,
    pub completed_at_epoch_ms: Option<u64>,
}

impl Job {
    pub fn new(
        name: impl Into<String>,
        hash_file: ArtifactId,
        wordlist: WordlistRef,
        hash_type: i64,
        attack_mode: i64,
        created_at_epoch_ms: u64,
    ) -> Self {
        Self {
            id: JobId::new(),
            name: name.into(),
            hash_file,
            wordlist,
            hash_type,
            attack_mode,
            rules: None,
            range: None,
            status: JobStatus::Pending,
            progress: 0.0,
            speed_hps: 0,
            eta_epoch_ms: None,
            assigned_agent: None,
            result: None,
            failure_reason: None,
            created_at_epoch_ms,
            started_at_epoch_ms: None,
            completed_at_epoch_ms: None,
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct JobBuilder => Job {
        into {
            name: String = "job",
        }
        set {
            hash_type: i64 = 0,
            attack_mode: i64 = 0,
            progress: f64 = 0.0,
            speed_hps: u64 = 0,
            created_at_epoch_ms: u64 = 0,
        }
        option {
            rules: String = None,
            range: SkipLimit = None,
            assigned_agent: AgentId = None,
            result: String = None,
            failure_reason: String = None,
            started_at_epoch_ms: u64 = None,
            completed_at_epoch_ms: u64 = None,
        }
        computed {
            id: JobId = JobId::new(),
            hash_file: ArtifactId = ArtifactId::new(),
            wordlist: WordlistRef = WordlistRef::Inline("a\nb\nc\n".to_string()),
            status: JobStatus = JobStatus::Pending,
            eta_epoch_ms: Option<u64> = None,
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
