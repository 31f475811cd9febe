// SPDX-License-Identifier: MIT

use super::*;
use hf_core::{Agent, AgentKey, ArtifactKind};

fn file(agent_id: AgentId, name: &str, hash: &str) -> LocalFile {
    LocalFile {
        agent_id,
        filename: name.to_string(),
        size_bytes: 10,
        content_hash: hash.to_string(),
        kind: ArtifactKind::Wordlist,
    }
}

fn agent_id() -> AgentId {
    Agent::provisional(AgentKey::new("k1")).id
}

#[test]
fn sync_reports_no_change_on_first_call_with_zero_files() {
    let index = LocalFileIndex::new();
    let id = agent_id();
    assert!(!index.sync(id, Vec::new()));
    assert!(index.for_agent(id).is_empty());
}

#[test]
fn sync_reports_change_when_cardinality_changes() {
    let index = LocalFileIndex::new();
    let id = agent_id();
    assert!(index.sync(id, vec![file(id, "a.txt", "hash-a")]));
    assert!(!index.sync(id, vec![file(id, "a.txt", "hash-a-renamed")]));
    assert!(index.sync(id, vec![file(id, "a.txt", "hash-a"), file(id, "b.txt", "hash-b")]));
}

#[test]
fn for_agent_returns_the_last_synced_set() {
    let index = LocalFileIndex::new();
    let id = agent_id();
    index.sync(id, vec![file(id, "a.txt", "hash-a")]);
    let files = index.for_agent(id);
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].filename, "a.txt");
}

#[test]
fn remove_agent_clears_its_advertised_set() {
    let index = LocalFileIndex::new();
    let id = agent_id();
    index.sync(id, vec![file(id, "a.txt", "hash-a")]);
    index.remove_agent(id);
    assert!(index.for_agent(id).is_empty());
}
