// SPDX-License-Identifier: MIT

//! `hashfleet partition preview` — run the Scheduler/Partitioner's
//! proportional-share math (spec §4.4, `hf_engine::partition`) over
//! operator-supplied agents without touching a registry or job store. Fast
//! iteration tool for an operator sizing a distributed job before creating
//! one for real.

use crate::exit_error::ExitError;
use crate::output::{print_value, OutputFormat};
use clap::Args;
use hf_core::{Agent, AgentKey, Capability, Status};
use hf_engine::partition::{order_by_weight, ranges};
use serde::Serialize;

#[derive(Debug, Args)]
pub struct PartitionPreviewArgs {
    /// Wordlist line count (spec §3 invariant 5: ranges cover [0, W)).
    #[arg(long)]
    wordlist_lines: u64,
    /// One entry per agent: `name:speed_hps:capability`. `speed_hps` may be
    /// 0 to exercise the capability-based weight fallback (spec §4.4 step
    /// 2). Repeat the flag once per agent.
    #[arg(long = "agent", value_name = "NAME:SPEED:CAPABILITY")]
    agents: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
struct RangePlanEntry {
    agent: String,
    skip: u64,
    limit: u64,
}

fn parse_agent_spec(spec: &str) -> Result<Agent, ExitError> {
    let mut parts = spec.splitn(3, ':');
    let (Some(name), Some(speed), Some(capability)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ExitError::usage(format!(
            "invalid --agent spec {spec:?}, expected NAME:SPEED:CAPABILITY"
        )));
    };
    let speed_hps: u64 = speed
        .parse()
        .map_err(|_| ExitError::usage(format!("invalid speed {speed:?} in --agent spec {spec:?}")))?;
    let mut agent = Agent::provisional(AgentKey::new(name));
    agent.name = name.to_string();
    agent.status = Status::Online;
    agent.speed_hps = speed_hps;
    agent.capability = if capability.is_empty() { None } else { Some(Capability::classify(capability)) };
    Ok(agent)
}

pub fn run(args: PartitionPreviewArgs, format: OutputFormat) -> Result<(), ExitError> {
    if args.agents.is_empty() {
        return Err(ExitError::usage("at least one --agent is required"));
    }
    let agents = args.agents.iter().map(|s| parse_agent_spec(s)).collect::<Result<Vec<_>, _>>()?;
    let names: std::collections::HashMap<_, _> = agents.iter().map(|a| (a.id, a.name.clone())).collect();

    let ordered = order_by_weight(agents);
    let plan = ranges(args.wordlist_lines, &ordered);
    let entries: Vec<RangePlanEntry> = plan
        .into_iter()
        .map(|(agent_id, range)| RangePlanEntry {
            agent: names.get(&agent_id).cloned().unwrap_or_default(),
            skip: range.skip,
            limit: range.limit,
        })
        .collect();

    match format {
        OutputFormat::Json => print_value(&entries, format),
        OutputFormat::Text => {
            for entry in &entries {
                println!("{:<16} skip={:<10} limit={}", entry.agent, entry.skip, entry.limit);
            }
        }
    }
    Ok(())
}
