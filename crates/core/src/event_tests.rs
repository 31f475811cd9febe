// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn agent_events_share_entity_key_by_agent_id() {
    let agent_id = AgentId::new();
    let a = Event::AgentStatus { agent_id, status: AgentStatus::Online };
    let b = Event::AgentSpeed { agent_id, speed_hps: 100 };
    assert_eq!(a.entity_key(), b.entity_key());
}

#[test]
fn job_and_agent_events_have_distinct_entity_keys() {
    let agent_id = AgentId::new();
    let job_id = JobId::new();
    let a = Event::AgentStatus { agent_id, status: AgentStatus::Online };
    let b = Event::JobStatus { job_id, status: JobStatus::Running };
    assert_ne!(a.entity_key(), b.entity_key());
}

#[test]
fn dropped_marker_has_no_entity_key() {
    assert_eq!(Event::Dropped { count: 3 }.entity_key(), None);
}

#[test]
fn event_roundtrips_through_json() {
    let event = Event::JobProgress {
        job_id: JobId::new(),
        progress: 42.5,
        speed_hps: 900,
        eta_epoch_ms: Some(123),
    };
    let json = serde_json::to_string(&event).unwrap();
    let back: Event = serde_json::from_str(&json).unwrap();
    assert_eq!(event, back);
}
