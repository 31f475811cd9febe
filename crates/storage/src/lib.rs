// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hf-storage: durable state for the control plane — the Agent Registry
//! (C3), Job Store (C5), and Artifact Catalog (C8), plus the append-only
//! write-ahead log and migration ledger standing in for a relational schema
//! and SQL migration runner.
//!
//! Deliberately synchronous: every public method here is a plain function
//! over a `parking_lot` lock, never an `async fn`. Callers in `hf-engine`
//! and `hf-daemon` invoke these from async contexts as short, non-blocking
//! critical sections — coarse-grained per-table locking, one `RwLock` per
//! table.
//!
//! Mutating methods return the [`hf_core::Event`]s they produced rather than
//! publishing them directly; this crate has no Event Bus dependency, so the
//! caller (which does) forwards them on.

pub mod catalog;
pub mod job_store;
pub mod local_files;
pub mod migration;
pub mod registry;
pub mod wal;

pub use catalog::ArtifactCatalog;
pub use job_store::{transition, Actor, JobEvent, JobStore};
pub use local_files::LocalFileIndex;
pub use migration::{AppliedMigration, Migration, MigrationLedger, MigrationRegistry};
pub use registry::AgentRegistry;
pub use wal::{Wal, WalError};
