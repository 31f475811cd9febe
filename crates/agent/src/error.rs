// SPDX-License-Identifier: MIT

//! Error taxonomy for the agent runtime.
//!
//! [`AgentError::Fatal`] is only ever returned from `init()` — a missing
//! agent key, an unresolvable local IP, or a config parse failure — and is
//! the only error variant `main()` is allowed to turn into a process exit.
//! Every background task instead logs [`AgentError::Transient`] and
//! continues to its next tick; this split mirrors the propagation policy
//! enforced at the type level throughout the rest of the workspace.

use hf_wire::WireError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("fatal: {0}")]
    Fatal(String),
    #[error("transient: {0}")]
    Transient(String),
}

impl AgentError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, AgentError::Fatal(_))
    }
}

impl From<std::io::Error> for AgentError {
    fn from(e: std::io::Error) -> Self {
        AgentError::Transient(e.to_string())
    }
}

impl From<WireError> for AgentError {
    fn from(e: WireError) -> Self {
        match e {
            WireError::Transient { message } => AgentError::Transient(message),
            other => AgentError::Transient(other.to_string()),
        }
    }
}

impl From<hf_adapters::error::AdapterError> for AgentError {
    fn from(e: hf_adapters::error::AdapterError) -> Self {
        AgentError::Transient(e.to_string())
    }
}
