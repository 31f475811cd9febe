// SPDX-License-Identifier: MIT

//! `hashfleet agent ...` — Agent Registry (C3) operator operations plus the
//! worker-side capability probe (C2), both exercised against a fresh
//! in-process registry/cracker rather than a long-running daemon (see
//! `crate::daemon` and DESIGN.md).

use crate::exit_error::ExitError;
use crate::output::{print_value, OutputFormat};
use clap::Subcommand;
use hf_adapters::RealCracker;
use hf_core::{AgentKey, Capability, Clock, SystemClock};
use hf_wire::AgentDto;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Subcommand)]
pub enum AgentCommand {
    /// Pre-provision an agent key, then immediately register it (the first
    /// registration attaches name/address/capability; spec §4.1).
    Register {
        /// Immutable, pre-provisioned identity (spec §3 Agent).
        #[arg(long)]
        key: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        ip: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        /// Free-text device label; classified per `Capability::classify`
        /// ("gpu" substring wins over "cpu").
        #[arg(long)]
        capability: Option<String>,
    },
    /// Run the capability probe (spec §4.2) against a real cracker binary's
    /// device-enumeration subcommand, falling back to the filesystem/PATH
    /// heuristic when its output names no recognizable device type.
    CapabilityProbe {
        /// Path to the external cracker binary (e.g. a hashcat build).
        #[arg(long)]
        cracker: PathBuf,
    },
}

pub async fn run(cmd: AgentCommand, format: OutputFormat) -> Result<(), ExitError> {
    match cmd {
        AgentCommand::Register { key, name, ip, port, capability } => register(key, name, ip, port, capability, format),
        AgentCommand::CapabilityProbe { cracker } => capability_probe(cracker, format).await,
    }
}

fn register(
    key: String,
    name: String,
    ip: Option<String>,
    port: Option<u16>,
    capability: Option<String>,
    format: OutputFormat,
) -> Result<(), ExitError> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let registry = hf_storage::AgentRegistry::new(clock);
    let key = AgentKey::new(key);
    registry.provision(key.clone());
    let capability = capability.map(|c| Capability::classify(&c));
    let (agent, _events) = registry
        .register(&key, name, ip, port, capability)
        .map_err(|e| ExitError::new(1, e.to_string()))?;
    print_value(&AgentDto::from(&agent), format);
    Ok(())
}

async fn capability_probe(cracker_path: PathBuf, format: OutputFormat) -> Result<(), ExitError> {
    let cracker = RealCracker::new(cracker_path);
    let capability = hf_agent::capability::probe(&cracker).await;
    print_value(&capability.to_string(), format);
    Ok(())
}
