// SPDX-License-Identifier: MIT

//! Artifact (C8 catalog) and agent-local-file types.

use crate::agent::AgentId;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Content-addressed identifier for an uploaded artifact.
    pub struct ArtifactId("art-");
}

/// The two artifact kinds the catalog understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Wordlist,
    HashFile,
}

crate::simple_display! {
    ArtifactKind {
        Wordlist => "wordlist",
        HashFile => "hash-file",
    }
}

/// Immutable artifact metadata tracked by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: ArtifactId,
    pub kind: ArtifactKind,
    pub name: String,
    pub size_bytes: u64,
    pub content_hash: String,
    /// Only meaningful for [`ArtifactKind::Wordlist`]; `None` when not yet
    /// computed — line counting is deferred to first use rather than forced
    /// on every upload.
    pub line_count: Option<u64>,
}

/// A (agent, filename, size, content-hash, kind) tuple the agent has
/// advertised to the control plane. Purely advisory — a missing local copy
/// is always recoverable by pulling from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalFile {
    pub agent_id: AgentId,
    pub filename: String,
    pub size_bytes: u64,
    pub content_hash: String,
    pub kind: ArtifactKind,
}

impl LocalFile {
    /// Whether this local file could satisfy a reference to `artifact`: by
    /// content hash match, or (fallback) by the artifact id appearing as a
    /// substring of the locally-advertised filename — mirrors the agent
    /// runtime's wordlist/hash-file resolution policy.
    pub fn satisfies(&self, artifact: &Artifact) -> bool {
        self.kind == artifact.kind
            && (self.content_hash == artifact.content_hash
                || self.filename.contains(artifact.id.as_str()))
    }
}

#[cfg(test)]
#[path = "artifact_tests.rs"]
mod tests;
