// SPDX-License-Identifier: MIT

//! The external cracker is the single most error-prone interaction in the
//! system, so it is isolated behind one narrow interface: [`CrackerProcess`]
//! spawns a [`CrackerHandle`] that can be line-read, waited on, and killed.
//! `hf-engine`/`hf-agent` hold a `Box<dyn CrackerProcess>` and never see
//! `tokio::process::Command` directly.

use crate::error::AdapterError;
use async_trait::async_trait;
use hf_core::SkipLimit;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// The fixed argument template passed to every invocation.
#[derive(Debug, Clone)]
pub struct HashcatArgs {
    pub hash_type: i64,
    pub attack_mode: i64,
    pub hash_file_path: PathBuf,
    pub wordlist_path: PathBuf,
    pub workload: u8,
    pub output_path: PathBuf,
    pub rules_path: Option<PathBuf>,
    pub range: Option<SkipLimit>,
}

impl HashcatArgs {
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "-m".to_string(),
            self.hash_type.to_string(),
            "-a".to_string(),
            self.attack_mode.to_string(),
            self.hash_file_path.display().to_string(),
            self.wordlist_path.display().to_string(),
            "-w".to_string(),
            self.workload.to_string(),
            "--status".to_string(),
            "--status-timer=2".to_string(),
            "--outfile".to_string(),
            self.output_path.display().to_string(),
            "--outfile-format".to_string(),
            "2".to_string(),
        ];
        if let Some(range) = &self.range {
            args.push("--skip".to_string());
            args.push(range.skip.to_string());
            args.push("--limit".to_string());
            args.push(range.limit.to_string());
        }
        if let Some(rules_path) = &self.rules_path {
            args.push("-r".to_string());
            args.push(rules_path.display().to_string());
        }
        args
    }
}

/// The exit-code classification for a finished cracker run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrackOutcome {
    Found(String),
    Exhausted,
    /// Exit code 255 is ambiguous upstream — deliberately NOT mapped to
    /// "not found"; surfaced as a failure with a reason the operator can
    /// disambiguate.
    AmbiguousExit255,
    Failed(String),
}

/// Read the per-job output file and classify the process exit code.
/// `output_path` is only opened on exit code 0 (password found).
pub async fn classify_exit(code: i32, output_path: &std::path::Path) -> CrackOutcome {
    match code {
        0 => {
            let content = tokio::fs::read_to_string(output_path).await.unwrap_or_default();
            let result = content
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .unwrap_or_default()
                .to_string();
            CrackOutcome::Found(result)
        }
        1 => CrackOutcome::Exhausted,
        255 => CrackOutcome::AmbiguousExit255,
        other => CrackOutcome::Failed(format!("cracker exited with code {other}")),
    }
}

#[async_trait]
pub trait CrackerHandle: Send {
    /// Next combined stdout/stderr line, or `None` once both streams close.
    async fn next_line(&mut self) -> Option<String>;
    async fn wait(&mut self) -> Result<i32, AdapterError>;
    async fn kill(&mut self) -> Result<(), AdapterError>;
}

#[async_trait]
pub trait CrackerProcess: Send + Sync {
    async fn spawn(&self, args: &HashcatArgs) -> Result<Box<dyn CrackerHandle>, AdapterError>;

    /// Raw textual output of the device-enumeration subcommand, scanned by
    /// the capability probe.
    async fn enumerate_devices(&self) -> Result<String, AdapterError>;
}

/// `tokio::process::Command`-backed implementation.
pub struct RealCracker {
    pub binary_path: PathBuf,
}

impl RealCracker {
    pub fn new(binary_path: impl Into<PathBuf>) -> Self {
        Self { binary_path: binary_path.into() }
    }
}

pub struct RealCrackerHandle {
    child: tokio::process::Child,
    lines_rx: mpsc::UnboundedReceiver<String>,
    _stdout_task: tokio::task::JoinHandle<()>,
    _stderr_task: tokio::task::JoinHandle<()>,
}

async fn pump_lines<R>(reader: R, tx: mpsc::UnboundedSender<String>)
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if tx.send(line).is_err() {
            break;
        }
    }
}

#[async_trait]
impl CrackerProcess for RealCracker {
    async fn spawn(&self, args: &HashcatArgs) -> Result<Box<dyn CrackerHandle>, AdapterError> {
        let mut command = tokio::process::Command::new(&self.binary_path);
        command
            .args(args.to_args())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true);
        let mut child = command.spawn().map_err(|e| AdapterError::Process(e.to_string()))?;
        // `Stdio::piped()` was set on this exact `Command` above; the child's
        // stdout/stderr handles are guaranteed present.
        #[allow(clippy::expect_used)]
        let stdout = child.stdout.take().expect("stdout piped at spawn");
        #[allow(clippy::expect_used)]
        let stderr = child.stderr.take().expect("stderr piped at spawn");
        let (tx, rx) = mpsc::unbounded_channel();
        let stdout_task = tokio::spawn(pump_lines(stdout, tx.clone()));
        let stderr_task = tokio::spawn(pump_lines(stderr, tx));
        Ok(Box::new(RealCrackerHandle {
            child,
            lines_rx: rx,
            _stdout_task: stdout_task,
            _stderr_task: stderr_task,
        }))
    }

    async fn enumerate_devices(&self) -> Result<String, AdapterError> {
        let output = tokio::process::Command::new(&self.binary_path)
            .arg("-I")
            .output()
            .await
            .map_err(|e| AdapterError::Process(e.to_string()))?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl CrackerHandle for RealCrackerHandle {
    async fn next_line(&mut self) -> Option<String> {
        self.lines_rx.recv().await
    }

    async fn wait(&mut self) -> Result<i32, AdapterError> {
        let status = self.child.wait().await?;
        Ok(status.code().unwrap_or(-1))
    }

    async fn kill(&mut self) -> Result<(), AdapterError> {
        self.child.start_kill().map_err(AdapterError::Io)
    }
}

/// A canned test double — emits a fixed line script and a fixed exit code,
/// with no subprocess involved. This is what makes end-to-end job scenarios
/// testable without an actual cracking binary installed.
#[cfg(any(test, feature = "test-support"))]
pub struct FakeCracker {
    pub lines: Vec<String>,
    pub exit_code: i32,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeCracker {
    pub fn new(lines: Vec<String>, exit_code: i32) -> Self {
        Self { lines, exit_code }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub struct FakeCrackerHandle {
    lines: std::collections::VecDeque<String>,
    exit_code: i32,
    killed: bool,
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl CrackerProcess for FakeCracker {
    async fn spawn(&self, _args: &HashcatArgs) -> Result<Box<dyn CrackerHandle>, AdapterError> {
        Ok(Box::new(FakeCrackerHandle {
            lines: self.lines.clone().into(),
            exit_code: self.exit_code,
            killed: false,
        }))
    }

    async fn enumerate_devices(&self) -> Result<String, AdapterError> {
        Ok("Device #1: Fake GPU Type: GPU".to_string())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl CrackerHandle for FakeCrackerHandle {
    async fn next_line(&mut self) -> Option<String> {
        self.lines.pop_front()
    }

    async fn wait(&mut self) -> Result<i32, AdapterError> {
        if self.killed {
            Ok(-1)
        } else {
            Ok(self.exit_code)
        }
    }

    async fn kill(&mut self) -> Result<(), AdapterError> {
        self.lines.clear();
        self.killed = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "cracker_tests.rs"]
mod tests;
