// SPDX-License-Identifier: MIT

//! `hashfleet health sweep` — run one Health Monitor sweep (C4, spec §4.3)
//! against synthetic agents whose last heartbeat is a given number of
//! seconds stale, using a `FakeClock` the way `health_tests.rs` does. Lets
//! an operator check a timeout/grace configuration against a scenario
//! without waiting for real wall-clock silence.

use crate::exit_error::ExitError;
use crate::output::{print_value, OutputFormat};
use clap::Args;
use hf_core::{AgentKey, Capability, FakeClock};
use hf_engine::{HealthMonitor, HealthMonitorConfig};
use hf_storage::{AgentRegistry, JobStore};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Args)]
pub struct HealthSweepArgs {
    /// One entry per agent: `key:silence_secs:capability`. `silence_secs`
    /// is how long ago the agent's last heartbeat landed.
    #[arg(long = "agent", value_name = "KEY:SILENCE_SECS:CAPABILITY")]
    agents: Vec<String>,
    #[arg(long, default_value_t = 5)]
    agent_timeout_secs: u64,
    #[arg(long, default_value_t = 2)]
    heartbeat_grace_secs: u64,
}

fn parse_spec(spec: &str) -> Result<(String, u64, String), ExitError> {
    let mut parts = spec.splitn(3, ':');
    let (Some(key), Some(silence), Some(capability)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ExitError::usage(format!("invalid --agent spec {spec:?}, expected KEY:SILENCE_SECS:CAPABILITY")));
    };
    let silence_secs: u64 =
        silence.parse().map_err(|_| ExitError::usage(format!("invalid silence_secs {silence:?} in {spec:?}")))?;
    Ok((key.to_string(), silence_secs, capability.to_string()))
}

pub async fn run(args: HealthSweepArgs, format: OutputFormat) -> Result<(), ExitError> {
    if args.agents.is_empty() {
        return Err(ExitError::usage("at least one --agent is required"));
    }
    let mut specs = args.agents.iter().map(|s| parse_spec(s)).collect::<Result<Vec<_>, _>>()?;
    let max_silence = specs.iter().map(|(_, s, _)| *s).max().unwrap_or(0);
    // Touch in ascending `silence_secs` first (i.e. descending touch time)
    // so the clock, which only ever runs forward, can land each agent's
    // heartbeat at its own offset from a shared `t=0`.
    specs.sort_by_key(|(_, silence_secs, _)| std::cmp::Reverse(*silence_secs));

    let clock = FakeClock::new();
    clock.set_epoch_ms(0);
    let registry = Arc::new(AgentRegistry::new(Arc::new(clock.clone())));
    let job_store = Arc::new(JobStore::new(Arc::new(clock.clone())));

    let mut elapsed_secs = 0u64;
    for (key, silence_secs, capability) in &specs {
        let touch_at = max_silence - *silence_secs;
        clock.advance(Duration::from_secs(touch_at - elapsed_secs));
        elapsed_secs = touch_at;

        let key = AgentKey::new(key.clone());
        registry.provision(key.clone());
        registry
            .register(
                &key,
                key.as_str().to_string(),
                Some(format!("10.0.0.{}", elapsed_secs + 1)),
                Some(4028),
                Some(Capability::classify(capability)),
            )
            .map_err(|e| ExitError::new(1, e.to_string()))?;
        registry.touch(&key).map_err(|e| ExitError::new(1, e.to_string()))?;
    }
    clock.advance(Duration::from_secs(max_silence - elapsed_secs));

    let config = HealthMonitorConfig {
        check_interval: Duration::from_secs(1),
        agent_timeout: Duration::from_secs(args.agent_timeout_secs),
        heartbeat_grace: Duration::from_secs(args.heartbeat_grace_secs),
        max_concurrent_checks: 20,
    };
    let monitor = HealthMonitor::new(registry.clone(), job_store, Arc::new(clock), config);
    monitor.sweep().await;

    let statuses: Vec<(String, String)> =
        registry.list_all().into_iter().map(|a| (a.name, a.status.to_string())).collect();
    match format {
        OutputFormat::Json => print_value(&statuses, format),
        OutputFormat::Text => {
            for (name, status) in statuses {
                println!("{name:<16} {status}");
            }
        }
    }
    Ok(())
}
