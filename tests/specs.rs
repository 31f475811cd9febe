// SPDX-License-Identifier: MIT

//! One integration test per numbered end-to-end scenario in the spec's
//! "Concrete end-to-end scenarios" list, each driving the real
//! `ControlPlane` (hf-daemon), `Scheduler`/`HealthMonitor` (hf-engine), and
//! `JobStore`/`AgentRegistry`/`ArtifactCatalog` (hf-storage) together — with
//! a `FakeCracker` standing in for the external cracking binary, never a
//! mock of this workspace's own code.

use hf_adapters::{AgentPaths, FakeCracker};
use hf_agent::{job_runner, ControlPlaneClient, InProcessClient};
use hf_core::{AgentKey, ArtifactKind, Clock, FakeClock, JobStatus, Status as AgentStatus, WordlistRef};
use hf_daemon::ControlPlane;
use hf_engine::HealthMonitorConfig;
use hf_wire::{RegisterAgentRequest, SpeedUpdateRequest};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn control_plane(clock: Arc<dyn Clock>, root: &std::path::Path) -> ControlPlane {
    ControlPlane::new(root.to_path_buf(), HealthMonitorConfig::default(), clock)
}

async fn register_online(cp: &ControlPlane, key: &str, capability: &str, speed_hps: u64) -> hf_wire::AgentDto {
    cp.provision_agent(AgentKey::new(key));
    let (agent, _created) = cp
        .register_agent(RegisterAgentRequest {
            agent_key: key.to_string(),
            name: key.to_string(),
            ip: Some(format!("10.0.0.{}", speed_hps % 250 + 1)),
            port: Some(4028),
            capability: Some(capability.to_string()),
        })
        .unwrap();
    cp.update_status(agent.id, AgentStatus::Online).unwrap();
    cp.update_speed(agent.id, SpeedUpdateRequest { speed_hps, status: None }).unwrap();
    cp.get_agent(agent.id).unwrap()
}

/// Scenario 1: happy path single-agent job. Registers one GPU agent, uploads
/// a three-line wordlist and a hash file, creates and auto-assigns a job,
/// then runs it to completion against a `FakeCracker` that reports 100%
/// progress and exits 0 with "password" in its output file.
#[tokio::test]
async fn happy_path_single_agent_job() {
    let dir = tempfile::tempdir().unwrap();
    let clock: Arc<dyn Clock> = Arc::new(FakeClock::new());
    let cp = Arc::new(control_plane(clock.clone(), dir.path()));

    let agent = register_online(&cp, "k1", "GPU", 1000).await;

    let wordlist =
        cp.upload_artifact(ArtifactKind::Wordlist, "w0.txt".to_string(), Cursor::new(b"a\nb\npassword\n".to_vec()))
            .await
            .unwrap();
    let hash_file = cp
        .upload_artifact(ArtifactKind::HashFile, "h0.txt".to_string(), Cursor::new(b"5f4dcc3b5aa765d61d8327deb882cf99\n".to_vec()))
        .await
        .unwrap();

    let created = cp.create_job("J0", hash_file.id, WordlistRef::Catalog(wordlist.id), 0, 0, None, clock.epoch_ms());
    let assigned = cp.scheduler().assign_single().unwrap();
    assert_eq!(assigned, Some(created.id));

    let client = InProcessClient::new(cp.clone());
    let next = client.get_next_job(agent.id).await.unwrap().expect("job ready to start");
    assert_eq!(next.status, JobStatus::Running);

    let paths = AgentPaths::new(dir.path());
    paths.ensure_dirs().await.unwrap();
    tokio::fs::write(paths.cracked_output(next.id), "password\n").await.unwrap();

    let cracker = FakeCracker::new(
        vec!["Progress.........: 1/3 (33.33%)".to_string(), "Progress.........: 3/3 (100.00%)".to_string()],
        0,
    );

    job_runner::run_job(
        &client,
        &cracker,
        &clock,
        &paths,
        agent.id,
        100,
        Duration::from_millis(5),
        10 * 1024 * 1024,
        CancellationToken::new(),
        &next,
    )
    .await
    .unwrap();

    let finished = cp.get_job(next.id).unwrap();
    assert_eq!(finished.status, JobStatus::Completed);
    assert_eq!(finished.result.as_deref(), Some("password"));
    assert_eq!(finished.progress, 100.0);
}

/// Scenario 2: distributed partition proportional to speed. Three online
/// agents (2000/1000/1000 hps) split a 100-line wordlist into disjoint,
/// covering ranges sized proportional to speed.
#[tokio::test]
async fn distributed_partition_proportional_to_speed() {
    let dir = tempfile::tempdir().unwrap();
    let clock: Arc<dyn Clock> = Arc::new(FakeClock::new());
    let cp = control_plane(clock.clone(), dir.path());

    let a = register_online(&cp, "a", "GPU", 2000).await;
    let b = register_online(&cp, "b", "GPU", 1000).await;
    let c = register_online(&cp, "c", "GPU", 1000).await;

    let wordlist_body: String = (0..100).map(|i| format!("word{i}\n")).collect();
    let wordlist = cp.upload_artifact(ArtifactKind::Wordlist, "w.txt".to_string(), Cursor::new(wordlist_body.into_bytes())).await.unwrap();
    let hash_file = cp.upload_artifact(ArtifactKind::HashFile, "h.txt".to_string(), Cursor::new(b"deadbeef\n".to_vec())).await.unwrap();

    let jobs = cp
        .distribute_job("distributed", hash_file.id, wordlist.id, 0, 0, None, &[a.id, b.id, c.id])
        .await
        .unwrap();
    assert_eq!(jobs.len(), 3);

    let by_agent: std::collections::HashMap<_, _> =
        jobs.iter().map(|j| (j.assigned_agent.expect("sibling job always assigned"), j.range.expect("distributed job always has a range"))).collect();

    let range_a = by_agent[&a.id];
    let range_b = by_agent[&b.id];
    let range_c = by_agent[&c.id];

    assert_eq!((range_a.skip, range_a.limit), (0, 50));
    assert_eq!((range_b.skip, range_b.limit), (50, 25));
    assert_eq!((range_c.skip, range_c.limit), (75, 25));

    let total: u64 = jobs.iter().map(|j| j.range.unwrap().limit).sum();
    assert_eq!(total, 100);
    let mut ends: Vec<u64> = jobs.iter().map(|j| j.range.unwrap().end()).collect();
    ends.sort();
    assert_eq!(ends, vec![25, 50, 100]);
}

/// Scenario 3: agent offline mid-job. A is running J1; it stops sending
/// heartbeats. After `agent_timeout + heartbeat_grace`, a health sweep
/// demotes A to offline and fails J1 with a reason containing "agent
/// offline", producing an `agent_status` event before the `job_status` one.
#[tokio::test]
async fn agent_offline_mid_job_fails_running_job() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(FakeClock::new());
    let clock_dyn: Arc<dyn Clock> = clock.clone();
    let cp = control_plane(clock_dyn.clone(), dir.path());

    let agent = register_online(&cp, "a", "GPU", 1000).await;

    let wordlist = cp.upload_artifact(ArtifactKind::Wordlist, "w.txt".to_string(), Cursor::new(b"a\nb\nc\n".to_vec())).await.unwrap();
    let hash_file = cp.upload_artifact(ArtifactKind::HashFile, "h.txt".to_string(), Cursor::new(b"deadbeef\n".to_vec())).await.unwrap();
    let created = cp.create_job("J1", hash_file.id, WordlistRef::Catalog(wordlist.id), 0, 0, None, clock.epoch_ms());
    cp.scheduler().assign_single().unwrap();
    let client = InProcessClient::new(Arc::new(cp));
    let started = client.get_next_job(agent.id).await.unwrap().expect("job assigned");
    assert_eq!(started.status, JobStatus::Running);

    // agent_timeout (5s default) + heartbeat_grace (2s default) + 1s margin.
    clock.advance(Duration::from_secs(8));

    let events = client.control_plane().health_monitor().sweep().await;

    let agent_again = client.control_plane().get_agent(agent.id).unwrap();
    assert_eq!(agent_again.status, hf_core::AgentStatus::Offline);

    let job_again = client.control_plane().get_job(created.id).unwrap();
    assert_eq!(job_again.status, JobStatus::Failed);
    assert_eq!(job_again.failure_reason.as_deref(), Some("agent offline"));

    let agent_status_idx = events.iter().position(|e| matches!(e, hf_core::Event::AgentStatus { .. }));
    let job_status_idx = events.iter().position(|e| matches!(e, hf_core::Event::JobStatus { .. }));
    assert!(agent_status_idx.is_some() && job_status_idx.is_some());
    assert!(agent_status_idx < job_status_idx, "agent_status must precede job_status in the sweep's event order");
}

/// Scenario 4: graceful shutdown preserves capability. Capability and speed
/// observed while online survive the single combined shutdown update; only
/// status and port change.
#[tokio::test]
async fn graceful_shutdown_preserves_capability_and_speed() {
    let dir = tempfile::tempdir().unwrap();
    let clock: Arc<dyn Clock> = Arc::new(FakeClock::new());
    let cp = control_plane(clock, dir.path());

    let agent = register_online(&cp, "a", "CPU", 1928).await;
    assert_eq!(agent.capability.as_deref(), Some("CPU"));

    cp.agent_shutdown(agent.id, Some(4028)).unwrap();

    let after = cp.get_agent(agent.id).unwrap();
    assert_eq!(after.status, hf_core::AgentStatus::Offline);
    assert_eq!(after.capability.as_deref(), Some("CPU"));
    assert_eq!(after.speed_hps, 1928);
    assert_eq!(after.port, Some(4028));
}

/// Scenario 5: progress monotonicity under reordering. Updates arriving out
/// of order (30, 45, 40) must never regress the stored value below its
/// running maximum.
#[tokio::test]
async fn progress_never_regresses_under_reordering() {
    let dir = tempfile::tempdir().unwrap();
    let clock: Arc<dyn Clock> = Arc::new(FakeClock::new());
    let cp = control_plane(clock.clone(), dir.path());

    let agent = register_online(&cp, "a", "GPU", 1000).await;
    let wordlist = cp.upload_artifact(ArtifactKind::Wordlist, "w.txt".to_string(), Cursor::new(b"a\nb\nc\n".to_vec())).await.unwrap();
    let hash_file = cp.upload_artifact(ArtifactKind::HashFile, "h.txt".to_string(), Cursor::new(b"deadbeef\n".to_vec())).await.unwrap();
    let created = cp.create_job("J5", hash_file.id, WordlistRef::Catalog(wordlist.id), 0, 0, None, clock.epoch_ms());
    cp.scheduler().assign_single().unwrap();
    let job = cp.get_next_job(agent.id).unwrap().expect("job assigned");
    assert_eq!(job.status, JobStatus::Running);

    for progress in [30.0, 45.0, 40.0] {
        cp.job_progress(
            job.id,
            hf_wire::JobProgressRequest {
                progress,
                speed_hps: 500,
                eta_epoch_ms: None,
                agent_id: agent.id,
                attack_mode: 0,
                rules: None,
            },
        )
        .unwrap();
    }

    let final_job = cp.get_job(created.id).unwrap();
    assert_eq!(final_job.progress, 45.0);
}

/// Scenario 6: artifact delete guarded by reference. A pending job still
/// referencing a wordlist blocks its deletion with a conflict; the artifact
/// survives the attempt.
#[tokio::test]
async fn artifact_delete_guarded_by_reference() {
    let dir = tempfile::tempdir().unwrap();
    let clock: Arc<dyn Clock> = Arc::new(FakeClock::new());
    let cp = control_plane(clock.clone(), dir.path());

    let wordlist = cp.upload_artifact(ArtifactKind::Wordlist, "w1.txt".to_string(), Cursor::new(b"a\nb\nc\n".to_vec())).await.unwrap();
    let hash_file = cp.upload_artifact(ArtifactKind::HashFile, "h.txt".to_string(), Cursor::new(b"deadbeef\n".to_vec())).await.unwrap();
    let _created = cp.create_job("J2", hash_file.id, WordlistRef::Catalog(wordlist.id), 0, 0, None, clock.epoch_ms());

    let result = cp.delete_artifact(wordlist.id);
    assert!(result.is_err(), "delete must be refused while J2 still references the wordlist");
    assert!(cp.list_artifacts(ArtifactKind::Wordlist).iter().any(|a| a.id == wordlist.id));
}
