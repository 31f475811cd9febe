// SPDX-License-Identifier: MIT

use hf_core::Event;
use serde::{Deserialize, Serialize};

/// The JSON frame a real-time push subscriber receives — a thin envelope
/// around the core [`Event`] so a future transport layer can add frame-level
/// metadata (sequence number, server timestamp) without touching the event
/// vocabulary itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventFrame {
    pub event: Event,
}

impl From<Event> for EventFrame {
    fn from(event: Event) -> Self {
        Self { event }
    }
}
