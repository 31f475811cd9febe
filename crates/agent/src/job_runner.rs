// SPDX-License-Identifier: MIT

//! Job execution (spec §4.2 "running a job", steps 1-8): resolve inputs,
//! spawn the cracker, stream its output through the parser while a
//! watchdog polls for an externally-observed status transition, then
//! classify the exit code into the matching control-plane update.
//!
//! The watchdog observing `paused`/`cancelled`/`failed` mid-run terminates
//! the process but writes no further state — that transition was someone
//! else's (operator or health monitor), and this loop must not race it.

use crate::artifacts;
use crate::client::ControlPlaneClient;
use crate::error::AgentError;
use hf_adapters::{classify_exit, AgentPaths, CrackOutcome, CrackerProcess, HashcatArgs};
use hf_core::{AgentId, Clock, JobStatus};
use hf_wire::{CompleteJobRequest, FailJobRequest, JobDto, JobProgressRequest};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;

enum StopReason {
    Cancelled,
    ExternallyTransitioned,
    StreamClosed,
}

/// Run exactly one job to completion (or to an externally-observed stop),
/// posting progress as it is parsed and a single terminal update at the end.
#[allow(clippy::too_many_arguments)]
pub async fn run_job(
    client: &dyn ControlPlaneClient,
    cracker: &dyn CrackerProcess,
    clock: &Arc<dyn Clock>,
    paths: &AgentPaths,
    agent_id: AgentId,
    workload: u8,
    watchdog_interval: Duration,
    large_download_threshold_bytes: u64,
    cancel: CancellationToken,
    job: &JobDto,
) -> Result<(), AgentError> {
    let hash_file_path =
        artifacts::resolve_hash_file(client, paths, agent_id, large_download_threshold_bytes, job.hash_file).await?;
    let wordlist_path = artifacts::resolve_wordlist(
        client,
        paths,
        agent_id,
        job.id,
        large_download_threshold_bytes,
        &job.wordlist,
    )
    .await?;

    client
        .job_progress(
            job.id,
            JobProgressRequest {
                progress: 0.0,
                speed_hps: 0,
                eta_epoch_ms: None,
                agent_id,
                attack_mode: job.attack_mode,
                rules: job.rules.clone(),
            },
        )
        .await?;

    let output_path = paths.cracked_output(job.id);
    let args = HashcatArgs {
        hash_type: job.hash_type,
        attack_mode: job.attack_mode,
        hash_file_path,
        wordlist_path,
        workload,
        output_path: output_path.clone(),
        rules_path: job.rules.as_ref().map(PathBuf::from),
        range: job.range,
    };
    let mut handle = cracker.spawn(&args).await?;

    let stop_reason = drive(client, clock, job, watchdog_interval, &cancel, handle.as_mut()).await;

    match stop_reason {
        StopReason::Cancelled | StopReason::ExternallyTransitioned => {
            let _ = handle.kill().await;
            let _ = handle.wait().await;
            let _ = tokio::fs::remove_file(&output_path).await;
            Ok(())
        }
        StopReason::StreamClosed => {
            let exit_code = handle.wait().await?;
            let outcome = classify_exit(exit_code, &output_path).await;
            let result = apply_outcome(client, job.id, outcome).await;
            let _ = tokio::fs::remove_file(&output_path).await;
            result
        }
    }
}

async fn drive(
    client: &dyn ControlPlaneClient,
    clock: &Arc<dyn Clock>,
    job: &JobDto,
    watchdog_interval: Duration,
    cancel: &CancellationToken,
    handle: &mut (dyn hf_adapters::CrackerHandle + '_),
) -> StopReason {
    let mut watchdog = tokio::time::interval(watchdog_interval);
    watchdog.tick().await;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return StopReason::Cancelled,
            _ = watchdog.tick() => {
                match client.get_job(job.id).await {
                    Ok(current) if matches!(current.status, JobStatus::Paused | JobStatus::Cancelled | JobStatus::Failed) => {
                        return StopReason::ExternallyTransitioned;
                    }
                    Ok(_) => {}
                    Err(e) => warn!(job_id = %job.id, error = %e, "job watchdog: failed to poll job status"),
                }
            }
            line = handle.next_line() => {
                match line {
                    Some(line) => {
                        if let Some(record) = hf_parser::parse_chunk(&line, clock.epoch_ms()) {
                            let body = JobProgressRequest {
                                progress: record.progress_pct,
                                speed_hps: record.speed_hps.unwrap_or(0).max(0) as u64,
                                eta_epoch_ms: record.eta_epoch_ms,
                                agent_id: job.assigned_agent.unwrap_or_default(),
                                attack_mode: job.attack_mode,
                                rules: job.rules.clone(),
                            };
                            if let Err(e) = client.job_progress(job.id, body).await {
                                warn!(job_id = %job.id, error = %e, "failed to post progress update");
                            }
                        }
                    }
                    None => return StopReason::StreamClosed,
                }
            }
        }
    }
}

async fn apply_outcome(client: &dyn ControlPlaneClient, job_id: hf_core::JobId, outcome: CrackOutcome) -> Result<(), AgentError> {
    match outcome {
        CrackOutcome::Found(result) => {
            client.complete_job(job_id, CompleteJobRequest { result }).await?;
        }
        CrackOutcome::Exhausted => {
            client.complete_job(job_id, CompleteJobRequest { result: "exhausted".to_string() }).await?;
        }
        CrackOutcome::AmbiguousExit255 => {
            client
                .fail_job(
                    job_id,
                    FailJobRequest { reason: "cracker exited with ambiguous code 255 (operator review required)".to_string() },
                )
                .await?;
        }
        CrackOutcome::Failed(reason) => {
            client.fail_job(job_id, FailJobRequest { reason }).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "job_runner_tests.rs"]
mod tests;
