// SPDX-License-Identifier: MIT

use super::*;
use hf_core::FakeClock;

fn registry() -> (AgentRegistry, Arc<FakeClock>) {
    let clock = Arc::new(FakeClock::new());
    (AgentRegistry::new(clock.clone()), clock)
}

#[test]
fn register_with_unprovisioned_key_is_rejected() {
    let (registry, _clock) = registry();
    let key = AgentKey::new("k1");
    let err = registry.register(&key, "worker-1".into(), None, None, None).unwrap_err();
    assert!(matches!(err, RegistryError::UnregisteredKey(k) if k == "k1"));
}

#[test]
fn register_is_idempotent_at_the_identity_level() {
    let (registry, _clock) = registry();
    let key = AgentKey::new("k1");
    registry.provision(key.clone());
    let (first, _) = registry.register(&key, "worker-1".into(), None, None, None).unwrap();
    let (second, _) = registry.register(&key, "worker-1".into(), Some("10.0.0.1".into()), Some(9000), None).unwrap();
    assert_eq!(first.id, second.id);
}

#[test]
fn register_rejects_name_mismatch() {
    let (registry, _clock) = registry();
    let key = AgentKey::new("k1");
    registry.provision(key.clone());
    registry.register(&key, "worker-1".into(), None, None, None).unwrap();
    let err = registry.register(&key, "worker-2".into(), None, None, None).unwrap_err();
    assert!(matches!(err, RegistryError::NameMismatch { .. }));
}

#[test]
fn register_rejects_ip_conflict_with_another_agent() {
    let (registry, _clock) = registry();
    let k1 = AgentKey::new("k1");
    let k2 = AgentKey::new("k2");
    registry.provision(k1.clone());
    registry.provision(k2.clone());
    registry.register(&k1, "worker-1".into(), Some("10.0.0.1".into()), None, None).unwrap();
    let err = registry.register(&k2, "worker-2".into(), Some("10.0.0.1".into()), None, None).unwrap_err();
    assert!(matches!(err, RegistryError::IpConflict { .. }));
}

#[test]
fn touch_brings_an_offline_agent_back_online_and_emits_an_event() {
    let (registry, _clock) = registry();
    let key = AgentKey::new("k1");
    registry.provision(key.clone());
    let (agent, _) = registry.register(&key, "worker-1".into(), None, None, None).unwrap();
    registry.update_status(agent.id, AgentStatus::Offline).unwrap();
    let events = registry.touch(&key).unwrap();
    assert_eq!(events.len(), 1);
    let agent = registry.get(agent.id).unwrap();
    assert_eq!(agent.status, AgentStatus::Online);
}

#[test]
fn update_speed_emits_an_event_only_when_the_value_changes() {
    let (registry, _clock) = registry();
    let key = AgentKey::new("k1");
    registry.provision(key.clone());
    let (agent, _) = registry.register(&key, "worker-1".into(), None, None, None).unwrap();
    let events = registry.update_speed(agent.id, 1000).unwrap();
    assert_eq!(events.len(), 1);
    let events = registry.update_speed(agent.id, 1000).unwrap();
    assert!(events.is_empty());
}

#[test]
fn list_all_preserves_registration_order_newest_first() {
    let (registry, clock) = registry();
    let k1 = AgentKey::new("k1");
    registry.provision(k1);
    clock.set_epoch_ms(clock.epoch_ms() + 1000);
    let k2 = AgentKey::new("k2");
    registry.provision(k2);
    let all = registry.list_all();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].key.as_str(), "k2");
    assert_eq!(all[1].key.as_str(), "k1");
}

#[test]
fn update_status_and_port_sets_both_without_touching_speed_or_capability() {
    let (registry, _clock) = registry();
    let key = AgentKey::new("k1");
    registry.provision(key.clone());
    let (agent, _) =
        registry.register(&key, "worker-1".into(), Some("10.0.0.1".into()), Some(9000), Some(Capability::Cpu)).unwrap();
    registry.update_speed(agent.id, 1928).unwrap();

    let events = registry.update_status_and_port(agent.id, AgentStatus::Offline, Some(9000)).unwrap();
    assert_eq!(events.len(), 1);

    let after = registry.get(agent.id).unwrap();
    assert_eq!(after.status, AgentStatus::Offline);
    assert_eq!(after.port, Some(9000));
    assert_eq!(after.speed_hps, 1928);
    assert_eq!(after.capability, Some(Capability::Cpu));
}

#[test]
fn update_status_and_port_is_a_noop_event_when_status_unchanged() {
    let (registry, _clock) = registry();
    let key = AgentKey::new("k1");
    registry.provision(key.clone());
    let (agent, _) = registry.register(&key, "worker-1".into(), None, Some(9000), None).unwrap();
    registry.update_status(agent.id, AgentStatus::Offline).unwrap();

    let events = registry.update_status_and_port(agent.id, AgentStatus::Offline, Some(9001)).unwrap();
    assert!(events.is_empty());
    assert_eq!(registry.get(agent.id).unwrap().port, Some(9001));
}

#[test]
fn remove_drops_agent_from_every_index() {
    let (registry, _clock) = registry();
    let key = AgentKey::new("k1");
    let agent = registry.provision(key.clone());
    registry.remove(agent.id).unwrap();
    assert!(registry.lookup_by_key(&key).is_none());
    assert!(registry.list_all().is_empty());
}
