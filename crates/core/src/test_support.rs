// SPDX-License-Identifier: MIT

//! Shared test fixtures re-exported under the `test-support` feature so
//! downstream crates (`hf-storage`, `hf-engine`, `hf-adapters`) don't each
//! reinvent small builders.

use crate::agent::{Agent, AgentKey, Capability, Status};
use crate::clock::FakeClock;

/// A fully-populated, eligible online agent with a given speed — the common
/// case needed by scheduler/partitioner tests.
pub fn online_agent(key: &str, capability: Capability, speed_hps: u64) -> Agent {
    let mut agent = Agent::provisional(AgentKey::new(key));
    agent.name = key.to_string();
    agent.status = Status::Online;
    agent.capability = Some(capability);
    agent.speed_hps = speed_hps;
    agent
}

/// A [`FakeClock`] pinned to a fixed, human-legible epoch (2024-01-01Z-ish)
/// so test assertions don't depend on wall-clock skew.
pub fn fixed_clock() -> FakeClock {
    let clock = FakeClock::new();
    clock.set_epoch_ms(1_700_000_000_000);
    clock
}

#[cfg(feature = "proptest")]
pub mod strategies {
    use crate::job::JobStatus;
    use proptest::prelude::*;

    pub fn job_status() -> impl Strategy<Value = JobStatus> {
        prop_oneof![
            Just(JobStatus::Pending),
            Just(JobStatus::Running),
            Just(JobStatus::Paused),
            Just(JobStatus::Completed),
            Just(JobStatus::Failed),
            Just(JobStatus::Cancelled),
        ]
    }
}
