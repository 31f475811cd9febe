// SPDX-License-Identifier: MIT

use super::*;
use hf_core::test_support::fixed_clock;
use hf_core::{AgentStatus, Clock};
use hf_daemon::HealthMonitorConfig;
use std::io::Cursor;

fn harness() -> (InProcessClient, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let clock: Arc<dyn Clock> = Arc::new(fixed_clock());
    let control_plane = Arc::new(ControlPlane::new(dir.path().to_path_buf(), HealthMonitorConfig::default(), clock));
    (InProcessClient::new(control_plane), dir)
}

#[tokio::test]
async fn register_reports_created_on_first_attempt_and_updated_on_the_second() {
    let (client, _dir) = harness();
    client.control_plane.provision_agent(hf_core::AgentKey::new("k1"));

    let (_agent, created) = client
        .register(RegisterAgentRequest {
            agent_key: "k1".to_string(),
            name: "worker-1".to_string(),
            ip: Some("10.0.0.1".to_string()),
            port: Some(9000),
            capability: Some("GPU".to_string()),
        })
        .await
        .unwrap();
    assert!(created);

    let (_agent, created_again) = client
        .register(RegisterAgentRequest {
            agent_key: "k1".to_string(),
            name: "worker-1".to_string(),
            ip: None,
            port: None,
            capability: None,
        })
        .await
        .unwrap();
    assert!(!created_again);
}

#[tokio::test]
async fn get_next_job_delegates_to_the_embedded_control_plane() {
    let (client, _dir) = harness();
    client.control_plane.provision_agent(hf_core::AgentKey::new("k1"));
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
    client.heartbeat("k1").await.unwrap();

    assert!(client.get_next_job(agent.id).await.unwrap().is_none());
}

#[tokio::test]
async fn download_wordlist_returns_the_artifact_metadata_alongside_the_file() {
    let (client, _dir) = harness();
    let mut reader = Cursor::new(b"aaa\nbbb\nccc\n".to_vec());
    let artifact =
        client.control_plane.upload_artifact(ArtifactKind::Wordlist, "rockyou.txt".to_string(), &mut reader).await.unwrap();

    let (resolved, _file) = client.download_wordlist(artifact.id).await.unwrap();
    assert_eq!(resolved.id, artifact.id);
    assert_eq!(resolved.size_bytes, 12);
}

#[tokio::test]
async fn sync_local_files_and_agent_shutdown_round_trip_through_the_client() {
    let (client, _dir) = harness();
    client.control_plane.provision_agent(hf_core::AgentKey::new("k1"));
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
    client.update_speed(agent.id, SpeedUpdateRequest { speed_hps: 1928, status: Some(AgentStatus::Online) }).await.unwrap();

    let files = vec![LocalFile {
        agent_id: agent.id,
        filename: "rockyou.txt".to_string(),
        size_bytes: 12,
        content_hash: "deadbeef".to_string(),
        kind: ArtifactKind::Wordlist,
    }];
    assert!(client.sync_local_files(agent.id, files).await);
    assert_eq!(client.local_files_for(agent.id).await.len(), 1);

    client.agent_shutdown(agent.id, Some(9000)).await.unwrap();
    let after = client.control_plane.get_agent(agent.id).unwrap();
    assert_eq!(after.status, AgentStatus::Offline);
    assert_eq!(after.port, Some(9000));
    assert_eq!(after.speed_hps, 1928);
}
