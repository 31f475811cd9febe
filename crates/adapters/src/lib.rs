// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hf-adapters: the agent-side boundary to the outside world — the external
//! cracker subprocess, the content-addressed artifact file store, and the
//! local-file watcher. Everything here does real I/O; `hf-engine` and
//! `hf-agent` depend on the trait, never the concrete `tokio::process`
//! plumbing, so tests run against [`cracker::FakeCracker`] instead.

pub mod cracker;
pub mod error;
pub mod file_store;
pub mod paths;
pub mod watcher;

pub use cracker::{classify_exit, CrackOutcome, CrackerHandle, CrackerProcess, HashcatArgs, RealCracker};
#[cfg(any(test, feature = "test-support"))]
pub use cracker::FakeCracker;
pub use error::AdapterError;
pub use file_store::{ArtifactFileStore, PutOutcome};
pub use paths::AgentPaths;
pub use watcher::scan_local_files;
