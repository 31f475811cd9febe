// SPDX-License-Identifier: MIT

//! A snapshot-migration runner standing in for a relational schema's SQL
//! migration runner. An integer-versioned, append-only migrations ledger
//! records each applied version with a timestamp and a content checksum, and
//! applying the same version twice is a no-op — implemented here over a JSON
//! snapshot value instead of a SQL schema. See DESIGN.md for the tradeoff.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("no migration registered from version {0}")]
    MissingStep(u32),
    #[error("migration from {source} to {target} failed: {message}")]
    Failed { source: u32, target: u32, message: String },
}

/// One forward step in the snapshot's schema evolution.
pub trait Migration: Send + Sync {
    fn source_version(&self) -> u32;
    fn target_version(&self) -> u32;
    fn migrate(&self, snapshot: serde_json::Value) -> Result<serde_json::Value, String>;
}

/// Ordered collection of [`Migration`]s, keyed by the version they apply
/// from. `migrate_to` walks the chain `current -> current+1 -> ... -> target`.
#[derive(Default)]
pub struct MigrationRegistry {
    steps: Vec<Box<dyn Migration>>,
}

impl MigrationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, migration: impl Migration + 'static) {
        self.steps.push(Box::new(migration));
    }

    pub fn migrate(
        &self,
        mut snapshot: serde_json::Value,
        from: u32,
        to: u32,
    ) -> Result<serde_json::Value, MigrationError> {
        let mut current = from;
        while current < to {
            let step = self
                .steps
                .iter()
                .find(|m| m.source_version() == current)
                .ok_or(MigrationError::MissingStep(current))?;
            let target = step.target_version();
            snapshot = step.migrate(snapshot).map_err(|message| MigrationError::Failed {
                source: current,
                target,
                message,
            })?;
            current = target;
        }
        Ok(snapshot)
    }
}

/// One row of the append-only migrations ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedMigration {
    pub version: u32,
    pub applied_at_epoch_ms: u64,
    pub checksum: String,
}

/// The ledger itself: tracks which versions have been applied so re-running
/// `apply` with the same version is a no-op rather than a duplicate row.
#[derive(Default)]
pub struct MigrationLedger {
    applied: RwLock<Vec<AppliedMigration>>,
}

impl MigrationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_applied(&self, version: u32) -> bool {
        self.applied.read().iter().any(|row| row.version == version)
    }

    /// Record `version` as applied. Returns `false` (no-op) if it was
    /// already recorded, `true` if this call appended a new row.
    pub fn apply(&self, version: u32, checksum: impl Into<String>, now_epoch_ms: u64) -> bool {
        if self.is_applied(version) {
            return false;
        }
        self.applied.write().push(AppliedMigration {
            version,
            applied_at_epoch_ms: now_epoch_ms,
            checksum: checksum.into(),
        });
        true
    }

    pub fn history(&self) -> Vec<AppliedMigration> {
        self.applied.read().clone()
    }

    pub fn current_version(&self) -> u32 {
        self.applied.read().iter().map(|row| row.version).max().unwrap_or(0)
    }
}

#[cfg(test)]
#[path = "migration_tests.rs"]
mod tests;
