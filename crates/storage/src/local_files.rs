// SPDX-License-Identifier: MIT

//! AgentLocalFile tracking: the control-plane's advisory view of which
//! artifact bytes each agent already holds locally. Purely advisory — a
//! missing entry here is always recoverable by pulling from the Artifact
//! Catalog, so this index is a plain `RwLock<HashMap>` with no durability
//! story of its own.

use hf_core::{AgentId, LocalFile};
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
pub struct LocalFileIndex {
    by_agent: RwLock<HashMap<AgentId, Vec<LocalFile>>>,
}

impl LocalFileIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the advertised set for `agent_id`. Returns `true` if the
    /// cardinality changed, which is the only signal the agent's watch loop
    /// needs to decide whether the resync was worth sending at all.
    pub fn sync(&self, agent_id: AgentId, files: Vec<LocalFile>) -> bool {
        let mut by_agent = self.by_agent.write();
        let changed = by_agent.get(&agent_id).map(|existing| existing.len()) != Some(files.len());
        by_agent.insert(agent_id, files);
        changed
    }

    pub fn for_agent(&self, agent_id: AgentId) -> Vec<LocalFile> {
        self.by_agent.read().get(&agent_id).cloned().unwrap_or_default()
    }

    pub fn remove_agent(&self, agent_id: AgentId) {
        self.by_agent.write().remove(&agent_id);
    }
}

#[cfg(test)]
#[path = "local_files_tests.rs"]
mod tests;
