// SPDX-License-Identifier: MIT

//! Shared error-kind taxonomy. Each storage/engine component returns one of
//! these rather than a stringly-typed error, so the
//! propagation policy (agents retry on Transient, abort only on Fatal
//! during init, job errors never cross jobs) is enforced by the type system
//! at call sites instead of by convention.

use crate::agent::AgentId;
use crate::artifact::ArtifactId;
use crate::job::JobId;
use thiserror::Error;

/// Errors from the Agent Registry (C3).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("agent key {0:?} is not pre-provisioned")]
    UnregisteredKey(String),
    #[error("agent key {key:?} is already registered under name {existing:?}, got {got:?}")]
    NameMismatch { key: String, existing: String, got: String },
    #[error("address {address:?} is already claimed by another agent")]
    IpConflict { address: String },
    #[error("no agent with id {0}")]
    NotFound(AgentId),
}

/// Errors from the Job Store (C5).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JobStoreError {
    #[error("no job with id {0}")]
    NotFound(JobId),
    #[error("job {0} is in a terminal state and cannot accept further updates")]
    TerminalState(JobId),
    #[error("invalid range: skip={skip} limit={limit}")]
    InvalidRange { skip: u64, limit: u64 },
    #[error("illegal transition for job {job_id}: {from} -> {to}")]
    IllegalTransition { job_id: JobId, from: String, to: String },
}

/// Errors from the Artifact Catalog (C8).
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no artifact with id {0}")]
    NotFound(ArtifactId),
    #[error("artifact {0} is still referenced by a non-terminal job")]
    Conflict(ArtifactId),
    #[error("artifact storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}
