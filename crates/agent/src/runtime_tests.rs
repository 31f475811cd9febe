// SPDX-License-Identifier: MIT

use super::*;
use crate::client::InProcessClient;
use crate::config::{AgentConfig, IntervalsSection};
use hf_adapters::FakeCracker;
use hf_core::test_support::fixed_clock;
use hf_core::{ArtifactKind, WordlistRef};
use hf_daemon::{ControlPlane, HealthMonitorConfig};
use hf_wire::RegisterAgentRequest;
use std::io::Cursor;

fn harness(dir: &std::path::Path) -> (Arc<InProcessClient>, AgentConfig) {
    let clock: Arc<dyn Clock> = Arc::new(fixed_clock());
    let control_plane = Arc::new(ControlPlane::new(dir.to_path_buf(), HealthMonitorConfig::default(), clock));
    let client = Arc::new(InProcessClient::new(control_plane));
    let config = AgentConfig {
        agent_key: "k1".to_string(),
        name: "worker-1".to_string(),
        local_files_root: dir.join("agent-local"),
        intervals: IntervalsSection {
            heartbeat_ms: 5,
            local_file_watch_ms: 5,
            job_poll_ms: 5,
            job_watchdog_ms: 50,
            ..IntervalsSection::default()
        },
        ..AgentConfig::default()
    };
    (client, config)
}

/// Running the three background tasks brings a silent-but-provisioned agent
/// online via the heartbeat loop, then draining posts exactly one combined
/// shutdown update that restores the pre-run port while leaving capability
/// and speed untouched.
#[tokio::test]
async fn run_heartbeats_then_drains_with_one_combined_shutdown_update() {
    let dir = tempfile::tempdir().unwrap();
    let (client, config) = harness(dir.path());
    client.control_plane().provision_agent(hf_core::AgentKey::new("k1"));
    let (agent, _created) = client
        .register(RegisterAgentRequest {
            agent_key: "k1".to_string(),
            name: "worker-1".to_string(),
            ip: Some("10.0.0.1".to_string()),
            port: Some(9000),
            capability: Some("CPU".to_string()),
        })
        .await
        .unwrap();
    client.update_speed(agent.id, hf_wire::SpeedUpdateRequest { speed_hps: 1500, status: None }).await.unwrap();

    let cracker: Arc<dyn CrackerProcess> = Arc::new(FakeCracker::new(vec![], 0));
    let clock: Arc<dyn Clock> = Arc::new(fixed_clock());
    let runtime = Arc::new(AgentRuntime::new(config, client.clone(), cracker, clock));

    let cancel = CancellationToken::new();
    let registered = Registered { agent_id: agent.id, port: Some(9000) };
    let run_cancel = cancel.clone();
    let handle = tokio::spawn(async move { runtime.run(registered, run_cancel).await });

    // Give the heartbeat loop time to tick at least once before draining.
    tokio::time::sleep(std::time::Duration::from_millis(30)).await;
    cancel.cancel();
    handle.await.unwrap();

    let after = client.control_plane().get_agent(agent.id).unwrap();
    assert_eq!(after.status, hf_core::AgentStatus::Offline);
    assert_eq!(after.port, Some(9000));
    assert_eq!(after.capability.as_deref(), Some("CPU"));
    assert_eq!(after.speed_hps, 1500);
}

/// The job-poll loop picks up an assigned job and runs it to completion
/// without a second poll racing in to start a concurrent one.
#[tokio::test]
async fn job_poll_loop_runs_one_assigned_job_to_completion() {
    let dir = tempfile::tempdir().unwrap();
    let (client, config) = harness(dir.path());
    client.control_plane().provision_agent(hf_core::AgentKey::new("k1"));
    let (agent, _created) = client
        .register(RegisterAgentRequest {
            agent_key: "k1".to_string(),
            name: "worker-1".to_string(),
            ip: Some("10.0.0.1".to_string()),
            port: Some(9000),
            capability: Some("GPU".to_string()),
        })
        .await
        .unwrap();

    let mut hash_reader = Cursor::new(b"deadbeef\n".to_vec());
    let hash_file =
        client.control_plane().upload_artifact(ArtifactKind::HashFile, "hashes.txt".to_string(), &mut hash_reader).await.unwrap();
    let job = client.control_plane().create_job(
        "job-1",
        hash_file.id,
        WordlistRef::Inline("aaa\nbbb\nccc\n".to_string()),
        0,
        0,
        None,
        fixed_clock().epoch_ms(),
    );
    client.control_plane().scheduler().assign_single().unwrap();

    let cracker: Arc<dyn CrackerProcess> = Arc::new(FakeCracker::new(vec!["Progress.....: 100%".to_string()], 1));
    let clock: Arc<dyn Clock> = Arc::new(fixed_clock());
    let runtime = Arc::new(AgentRuntime::new(config, client.clone(), cracker, clock));

    let cancel = CancellationToken::new();
    let registered = Registered { agent_id: agent.id, port: Some(9000) };
    let run_cancel = cancel.clone();
    let handle = tokio::spawn(async move { runtime.run(registered, run_cancel).await });

    // A handful of 5ms poll ticks is comfortably enough for one FakeCracker
    // run (no real subprocess, no real I/O) to complete.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    cancel.cancel();
    handle.await.unwrap();

    let after = client.control_plane().get_job(job.id).unwrap();
    assert_eq!(after.status, hf_core::JobStatus::Completed);
    assert_eq!(after.result.as_deref(), Some("exhausted"));
}
