// SPDX-License-Identifier: MIT

//! Artifact Catalog (C8) metadata store. Byte storage and hashing live in
//! `hf-adapters`; this type only tracks the metadata row and the
//! content-hash → id dedup index, plus the deletion guard that refuses a
//! delete while any non-terminal job still references the artifact.
//!
//! Dedup is the chosen idempotency policy — `put` with a content hash
//! already on file returns the existing id rather than minting a new one.

use hf_core::{Artifact, ArtifactId, ArtifactKind, CatalogError};
use parking_lot::RwLock;
use std::collections::HashMap;

pub struct ArtifactCatalog {
    by_id: RwLock<HashMap<ArtifactId, Artifact>>,
    by_hash: RwLock<HashMap<String, ArtifactId>>,
}

impl Default for ArtifactCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactCatalog {
    pub fn new() -> Self {
        Self { by_id: RwLock::new(HashMap::new()), by_hash: RwLock::new(HashMap::new()) }
    }

    /// Record an artifact whose bytes have already been written to the
    /// content-addressed store under `content_hash` by `hf-adapters`.
    /// Returns the artifact's id and whether this call created a new row
    /// (`false` when it deduped to an existing one).
    pub fn put(
        &self,
        kind: ArtifactKind,
        name: String,
        size_bytes: u64,
        content_hash: String,
    ) -> (ArtifactId, bool) {
        if let Some(&existing) = self.by_hash.read().get(&content_hash) {
            return (existing, false);
        }
        let mut by_hash = self.by_hash.write();
        // Re-check under the write lock: another writer may have raced us.
        if let Some(&existing) = by_hash.get(&content_hash) {
            return (existing, false);
        }
        let artifact = Artifact {
            id: ArtifactId::new(),
            kind,
            name,
            size_bytes,
            content_hash: content_hash.clone(),
            line_count: None,
        };
        let id = artifact.id;
        by_hash.insert(content_hash, id);
        self.by_id.write().insert(id, artifact);
        (id, true)
    }

    pub fn get_meta(&self, id: ArtifactId) -> Result<Artifact, CatalogError> {
        self.by_id.read().get(&id).cloned().ok_or(CatalogError::NotFound(id))
    }

    pub fn list(&self, kind: ArtifactKind) -> Vec<Artifact> {
        self.by_id.read().values().filter(|a| a.kind == kind).cloned().collect()
    }

    /// Record a computed line count (on upload, or lazily on first use).
    pub fn set_line_count(&self, id: ArtifactId, line_count: u64) -> Result<(), CatalogError> {
        let mut by_id = self.by_id.write();
        let artifact = by_id.get_mut(&id).ok_or(CatalogError::NotFound(id))?;
        artifact.line_count = Some(line_count);
        Ok(())
    }

    /// Delete the artifact's metadata row. `referenced` is supplied by the
    /// caller (which has visibility into the Job Store) — `true` refuses the
    /// delete while any non-terminal job still points at this artifact.
    pub fn delete(&self, id: ArtifactId, referenced: bool) -> Result<(), CatalogError> {
        if referenced {
            return Err(CatalogError::Conflict(id));
        }
        let mut by_id = self.by_id.write();
        let artifact = by_id.remove(&id).ok_or(CatalogError::NotFound(id))?;
        self.by_hash.write().remove(&artifact.content_hash);
        Ok(())
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
