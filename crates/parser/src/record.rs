// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

/// One parsed progress observation from a cracker output buffer.
///
/// A record is only ever produced when a progress match is found; `speed_hps`
/// and `eta_epoch_ms` are filled in when their labels also appear in the same
/// buffer, otherwise left at their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub progress_pct: f64,
    pub speed_hps: Option<i64>,
    pub eta_epoch_ms: Option<u64>,
}

impl ProgressRecord {
    pub fn progress_only(progress_pct: f64) -> Self {
        Self { progress_pct, speed_hps: None, eta_epoch_ms: None }
    }
}
