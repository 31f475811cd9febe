// SPDX-License-Identifier: MIT

use super::*;
use hf_adapters::AgentPaths;
use hf_core::{test_support::fixed_clock, AgentKey, Capability};
use std::io::Cursor;

#[allow(clippy::type_complexity)]
fn harness() -> (
    Scheduler,
    Arc<AgentRegistry>,
    Arc<JobStore>,
    Arc<ArtifactCatalog>,
    Arc<ArtifactFileStore>,
    tempfile::TempDir,
) {
    let clock: Arc<dyn Clock> = Arc::new(fixed_clock());
    let registry = Arc::new(AgentRegistry::new(clock.clone()));
    let job_store = Arc::new(JobStore::new(clock.clone()));
    let catalog = Arc::new(ArtifactCatalog::new());
    let dir = tempfile::tempdir().unwrap();
    let file_store = Arc::new(ArtifactFileStore::new(AgentPaths::new(dir.path().to_path_buf())));
    let scheduler = Scheduler::new(registry.clone(), job_store.clone(), catalog.clone(), file_store.clone(), clock);
    (scheduler, registry, job_store, catalog, file_store, dir)
}

fn provision_online(registry: &AgentRegistry, key: &str, capability: Capability, speed: u64) -> AgentId {
    registry.provision(AgentKey::new(key));
    let (agent, _) =
        registry.register(&AgentKey::new(key), key.into(), Some(format!("10.0.0.{key}")), Some(9000), Some(capability)).unwrap();
    registry.touch(&AgentKey::new(key)).unwrap();
    registry.update_speed(agent.id, speed).unwrap();
    agent.id
}

#[tokio::test]
async fn single_agent_assignment_picks_the_fastest_idle_agent() {
    let (scheduler, registry, job_store, _catalog, _fs, _dir) = harness();
    provision_online(&registry, "slow", Capability::Gpu, 500);
    let fast = provision_online(&registry, "fast", Capability::Gpu, 2000);

    let job = hf_core::JobBuilder::default().build();
    job_store.create(job.clone());

    let assigned = scheduler.assign_single().unwrap().unwrap();
    assert_eq!(assigned, job.id);
    assert_eq!(job_store.get(job.id).unwrap().assigned_agent, Some(fast));
    assert_eq!(job_store.get(job.id).unwrap().status, JobStatus::Pending);
}

#[tokio::test]
async fn single_agent_assignment_skips_busy_agents() {
    let (scheduler, registry, job_store, _catalog, _fs, _dir) = harness();
    let busy = provision_online(&registry, "busy", Capability::Gpu, 5000);
    let idle = provision_online(&registry, "idle", Capability::Gpu, 100);

    let running = hf_core::JobBuilder::default().build();
    job_store.create(running.clone());
    job_store.assign(running.id, busy).unwrap();
    job_store.start(running.id).unwrap();

    let pending = hf_core::JobBuilder::default().build();
    job_store.create(pending.clone());

    let assigned = scheduler.assign_single().unwrap().unwrap();
    assert_eq!(assigned, pending.id);
    assert_eq!(job_store.get(pending.id).unwrap().assigned_agent, Some(idle));
}

#[tokio::test]
async fn assign_single_returns_none_when_nothing_is_pending() {
    let (scheduler, registry, _job_store, _catalog, _fs, _dir) = harness();
    provision_online(&registry, "a", Capability::Gpu, 1000);
    assert_eq!(scheduler.assign_single().unwrap(), None);
}

#[tokio::test]
async fn distribute_splits_proportional_to_speed_and_computes_unknown_line_count() {
    let (scheduler, registry, job_store, catalog, file_store, _dir) = harness();
    let a = provision_online(&registry, "a", Capability::Gpu, 2000);
    let b = provision_online(&registry, "b", Capability::Gpu, 1000);
    let c = provision_online(&registry, "c", Capability::Gpu, 1000);

    let wordlist_bytes: Vec<u8> = (0..100).map(|_| b'x').fold(Vec::new(), |mut acc, _| {
        acc.extend_from_slice(b"word\n");
        acc
    });
    let outcome = file_store.put_stream(hf_core::ArtifactKind::Wordlist, Cursor::new(wordlist_bytes)).await.unwrap();
    let (wordlist_id, _) =
        catalog.put(hf_core::ArtifactKind::Wordlist, "rockyou.txt".into(), outcome.size_bytes, outcome.content_hash);
    let (hash_file_id, _) =
        catalog.put(hf_core::ArtifactKind::HashFile, "targets.hash".into(), 32, "deadbeef".into());

    let events = scheduler
        .distribute("crack-md5", hash_file_id, wordlist_id, 0, 0, None, &[a, b, c])
        .await
        .unwrap();
    assert_eq!(events.len(), 3);

    let jobs = job_store.list_all();
    assert_eq!(jobs.len(), 3);
    let total_limit: u64 = jobs.iter().filter_map(|j| j.range).map(|r| r.limit).sum();
    assert_eq!(total_limit, 100);

    let a_job = jobs.iter().find(|j| j.assigned_agent == Some(a)).unwrap();
    assert_eq!(a_job.range.unwrap().skip, 0);
    assert_eq!(a_job.range.unwrap().limit, 50);

    assert_eq!(catalog.get_meta(wordlist_id).unwrap().line_count, Some(100));
}

#[tokio::test]
async fn distribute_rejects_an_ineligible_agent() {
    let (scheduler, registry, _job_store, catalog, file_store, _dir) = harness();
    let offline = {
        registry.provision(AgentKey::new("off"));
        registry.register(&AgentKey::new("off"), "off".into(), None, None, None).unwrap().0.id
    };
    let outcome = file_store.put_stream(hf_core::ArtifactKind::Wordlist, Cursor::new(b"a\nb\n".to_vec())).await.unwrap();
    let (wordlist_id, _) =
        catalog.put(hf_core::ArtifactKind::Wordlist, "w".into(), outcome.size_bytes, outcome.content_hash);
    let (hash_file_id, _) = catalog.put(hf_core::ArtifactKind::HashFile, "h".into(), 4, "cafe".into());

    let err = scheduler
        .distribute("j", hash_file_id, wordlist_id, 0, 0, None, &[offline])
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::AgentNotEligible(id) if id == offline));
}

#[tokio::test]
async fn distribute_with_an_empty_wordlist_creates_no_jobs() {
    let (scheduler, registry, job_store, catalog, file_store, _dir) = harness();
    let a = provision_online(&registry, "a", Capability::Gpu, 1000);
    let outcome = file_store.put_stream(hf_core::ArtifactKind::Wordlist, Cursor::new(Vec::new())).await.unwrap();
    let (wordlist_id, _) =
        catalog.put(hf_core::ArtifactKind::Wordlist, "empty".into(), outcome.size_bytes, outcome.content_hash);
    let (hash_file_id, _) = catalog.put(hf_core::ArtifactKind::HashFile, "h".into(), 4, "cafe".into());

    let events = scheduler.distribute("j", hash_file_id, wordlist_id, 0, 0, None, &[a]).await.unwrap();
    assert!(events.is_empty());
    assert!(job_store.list_all().is_empty());
}
