// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn defaults_are_populated_without_a_config_file() {
    let config = DaemonConfig::default();
    assert_eq!(config.health_monitor.check_interval_ms, 1_000);
    assert_eq!(config.health_monitor.agent_timeout_ms, 5_000);
}

#[test]
fn load_or_default_falls_back_when_the_file_is_absent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.toml");
    let config = DaemonConfig::load_or_default(&path).unwrap();
    assert_eq!(config.health_monitor.max_concurrent_checks, 20);
}

#[test]
fn a_partial_toml_file_only_overrides_the_fields_it_sets() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hashfleetd.toml");
    std::fs::write(&path, "[health_monitor]\ncheck_interval_ms = 500\n").unwrap();
    let config = DaemonConfig::load(&path).unwrap();
    assert_eq!(config.health_monitor.check_interval_ms, 500);
    assert_eq!(config.health_monitor.agent_timeout_ms, 5_000);
}

#[test]
fn a_malformed_toml_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hashfleetd.toml");
    std::fs::write(&path, "not valid toml = [").unwrap();
    assert!(matches!(DaemonConfig::load(&path), Err(ConfigError::Parse { .. })));
}
