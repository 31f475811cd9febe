// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn defaults_are_populated_except_the_mandatory_agent_key() {
    let config = AgentConfig::default();
    assert_eq!(config.intervals.heartbeat_ms, 1_000);
    assert_eq!(config.intervals.job_poll_ms, 5_000);
    assert!(config.agent_key.is_empty());
}

#[test]
fn load_or_default_is_fatal_when_no_file_and_no_key_configured() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.toml");
    let err = AgentConfig::load_or_default(&path).unwrap_err();
    assert!(matches!(err, ConfigError::MissingAgentKey));
}

#[test]
fn a_partial_toml_file_only_overrides_the_fields_it_sets() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hashfleet-agent.toml");
    std::fs::write(&path, "agent_key = \"k1\"\n\n[intervals]\nheartbeat_ms = 250\n").unwrap();
    let config = AgentConfig::load(&path).unwrap();
    assert_eq!(config.agent_key, "k1");
    assert_eq!(config.intervals.heartbeat_ms, 250);
    assert_eq!(config.intervals.job_poll_ms, 5_000);
}

#[test]
fn an_empty_agent_key_fails_validation_even_with_a_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hashfleet-agent.toml");
    std::fs::write(&path, "agent_key = \"\"\n").unwrap();
    let err = AgentConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::MissingAgentKey));
}

#[test]
fn a_malformed_toml_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hashfleet-agent.toml");
    std::fs::write(&path, "not valid toml = [").unwrap();
    assert!(matches!(AgentConfig::load(&path), Err(ConfigError::Parse { .. })));
}
