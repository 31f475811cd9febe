// SPDX-License-Identifier: MIT

use hf_core::{ArtifactId, CatalogError, JobStoreError, RegistryError};
use thiserror::Error;

/// Errors surfaced by the Scheduler/Partitioner and Health Monitor (C4/C6).
/// Everything here is a caller-visible, job/request-scoped precondition
/// failure, never a reason for a background task to abort.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no eligible agents available")]
    NoEligibleAgents,
    #[error("agent {0} is not eligible (offline, busy, or capability unset)")]
    AgentNotEligible(hf_core::AgentId),
    #[error("wordlist artifact {0} has no known line count")]
    UnknownWordlistLength(ArtifactId),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    JobStore(#[from] JobStoreError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
