// SPDX-License-Identifier: MIT

//! `hashfleet job distribute` — the full distributed-partitioning path
//! (spec §4.4) wired end to end against a fresh `ControlPlane`: provision
//! and register the named agents, upload the hash-file/wordlist from local
//! paths, then distribute. Nothing here persists past the process exit (see
//! `crate::daemon` and DESIGN.md) — this is an operator preview of the
//! sibling-Job plan a real distribute call against a running daemon would
//! produce, exercising the real Scheduler/Registry/Catalog code instead of
//! `hf_engine::partition`'s pure math directly (compare `partition preview`).

use crate::exit_error::ExitError;
use crate::output::{print_value, OutputFormat};
use clap::Args;
use hf_core::{AgentId, AgentKey, AgentStatus, ArtifactKind, Clock, SystemClock};
use hf_daemon::ControlPlane;
use hf_wire::{RegisterAgentRequest, SpeedUpdateRequest};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct JobDistributeArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    hash_file: PathBuf,
    #[arg(long)]
    wordlist: PathBuf,
    #[arg(long)]
    hash_type: i64,
    #[arg(long)]
    attack_mode: i64,
    #[arg(long)]
    rules: Option<String>,
    /// Where uploaded artifact bytes land; defaults to a scratch directory
    /// under the OS temp dir.
    #[arg(long)]
    upload_root: Option<PathBuf>,
    /// One entry per agent: `key:speed_hps:capability`. Repeat once per
    /// agent in the distribution set.
    #[arg(long = "agent", value_name = "KEY:SPEED:CAPABILITY")]
    agents: Vec<String>,
}

fn parse_agent_spec(spec: &str) -> Result<(String, u64, String), ExitError> {
    let mut parts = spec.splitn(3, ':');
    let (Some(key), Some(speed), Some(capability)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ExitError::usage(format!("invalid --agent spec {spec:?}, expected KEY:SPEED:CAPABILITY")));
    };
    let speed_hps: u64 = speed.parse().map_err(|_| ExitError::usage(format!("invalid speed {speed:?} in {spec:?}")))?;
    Ok((key.to_string(), speed_hps, capability.to_string()))
}

pub async fn run(args: JobDistributeArgs, format: OutputFormat) -> Result<(), ExitError> {
    if args.agents.is_empty() {
        return Err(ExitError::usage("at least one --agent is required"));
    }
    let agent_specs =
        args.agents.iter().map(|s| parse_agent_spec(s)).collect::<Result<Vec<_>, _>>()?;

    let upload_root = args
        .upload_root
        .unwrap_or_else(|| std::env::temp_dir().join(format!("hashfleet-cli-{}", std::process::id())));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let control_plane = ControlPlane::new(upload_root, hf_engine::HealthMonitorConfig::default(), clock.clone());

    let mut agent_ids = Vec::with_capacity(agent_specs.len());
    for (key, speed_hps, capability) in agent_specs {
        let agent_key = AgentKey::new(key.clone());
        control_plane.provision_agent(agent_key.clone());
        let (agent, _created) = control_plane
            .register_agent(RegisterAgentRequest {
                agent_key: key.clone(),
                name: key,
                ip: Some("127.0.0.1".to_string()),
                port: Some(0),
                capability: Some(capability),
            })
            .map_err(|e| ExitError::new(1, format!("{e:?}")))?;
        let id: AgentId = agent.id;
        control_plane.update_status(id, AgentStatus::Online).map_err(|e| ExitError::new(1, format!("{e:?}")))?;
        control_plane
            .update_speed(id, SpeedUpdateRequest { speed_hps, status: None })
            .map_err(|e| ExitError::new(1, format!("{e:?}")))?;
        agent_ids.push(id);
    }

    let hash_file = upload(&control_plane, ArtifactKind::HashFile, &args.hash_file).await?;
    let wordlist = upload(&control_plane, ArtifactKind::Wordlist, &args.wordlist).await?;

    let jobs = control_plane
        .distribute_job(&args.name, hash_file, wordlist, args.hash_type, args.attack_mode, args.rules, &agent_ids)
        .await
        .map_err(|e| ExitError::new(1, format!("{e:?}")))?;

    print_value(&jobs, format);
    Ok(())
}

async fn upload(control_plane: &ControlPlane, kind: ArtifactKind, path: &PathBuf) -> Result<hf_core::ArtifactId, ExitError> {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| "artifact".to_string());
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| ExitError::new(1, format!("failed to open {}: {e}", path.display())))?;
    let dto = control_plane
        .upload_artifact(kind, name, file)
        .await
        .map_err(|e| ExitError::new(1, format!("{e:?}")))?;
    Ok(dto.id)
}
