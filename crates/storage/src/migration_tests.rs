// SPDX-License-Identifier: MIT

use super::*;

struct AddField;

impl Migration for AddField {
    fn source_version(&self) -> u32 {
        0
    }

    fn target_version(&self) -> u32 {
        1
    }

    fn migrate(&self, mut snapshot: serde_json::Value) -> Result<serde_json::Value, String> {
        snapshot["schema_extra"] = serde_json::json!("present");
        Ok(snapshot)
    }
}

struct RenameField;

impl Migration for RenameField {
    fn source_version(&self) -> u32 {
        1
    }

    fn target_version(&self) -> u32 {
        2
    }

    fn migrate(&self, mut snapshot: serde_json::Value) -> Result<serde_json::Value, String> {
        if let Some(value) = snapshot.get("schema_extra").cloned() {
            snapshot["schema_extra_renamed"] = value;
        }
        Ok(snapshot)
    }
}

#[test]
fn migrate_chains_consecutive_steps() {
    let mut registry = MigrationRegistry::new();
    registry.register(AddField);
    registry.register(RenameField);
    let out = registry.migrate(serde_json::json!({}), 0, 2).unwrap();
    assert_eq!(out["schema_extra_renamed"], serde_json::json!("present"));
}

#[test]
fn migrate_with_missing_step_fails() {
    let registry = MigrationRegistry::new();
    let err = registry.migrate(serde_json::json!({}), 0, 1).unwrap_err();
    assert!(matches!(err, MigrationError::MissingStep(0)));
}

#[test]
fn ledger_apply_is_idempotent() {
    let ledger = MigrationLedger::new();
    assert!(ledger.apply(1, "abc123", 1_000));
    assert!(!ledger.apply(1, "abc123", 2_000));
    assert_eq!(ledger.history().len(), 1);
    assert_eq!(ledger.current_version(), 1);
}

#[test]
fn ledger_tracks_highest_applied_version() {
    let ledger = MigrationLedger::new();
    ledger.apply(1, "a", 1_000);
    ledger.apply(2, "b", 2_000);
    assert_eq!(ledger.current_version(), 2);
}
