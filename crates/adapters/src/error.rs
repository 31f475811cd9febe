// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Transient-by-default: every variant here is the kind of error an agent
/// background task logs and retries on the next tick, never a reason to
/// abort the process.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cracker process could not be spawned or joined: {0}")]
    Process(String),
}
