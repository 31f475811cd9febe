// SPDX-License-Identifier: MIT

use hf_core::{CatalogError, JobStoreError, RegistryError};
use serde::{Deserialize, Serialize};

/// The error-kind taxonomy, serialized as a wire-level tag rather than a
/// free-text message so a caller can branch on `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WireError {
    InputInvalid { message: String },
    KeyNotFound { key: String },
    NameMismatch { key: String, existing: String, got: String },
    IpConflict { address: String },
    NotFound { message: String },
    Conflict { message: String },
    Transient { message: String },
}

impl From<RegistryError> for WireError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::UnregisteredKey(key) => WireError::KeyNotFound { key },
            RegistryError::NameMismatch { key, existing, got } => {
                WireError::NameMismatch { key, existing, got }
            }
            RegistryError::IpConflict { address } => WireError::IpConflict { address },
            RegistryError::NotFound(id) => WireError::NotFound { message: id.to_string() },
        }
    }
}

impl From<JobStoreError> for WireError {
    fn from(err: JobStoreError) -> Self {
        match err {
            JobStoreError::NotFound(id) => WireError::NotFound { message: id.to_string() },
            JobStoreError::TerminalState(_)
            | JobStoreError::IllegalTransition { .. } => {
                WireError::Conflict { message: err.to_string() }
            }
            JobStoreError::InvalidRange { .. } => {
                WireError::InputInvalid { message: err.to_string() }
            }
        }
    }
}

impl From<CatalogError> for WireError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => WireError::NotFound { message: id.to_string() },
            CatalogError::Conflict(id) => {
                WireError::Conflict { message: format!("artifact {id} is still referenced") }
            }
            CatalogError::Io(e) => WireError::Transient { message: e.to_string() },
        }
    }
}
