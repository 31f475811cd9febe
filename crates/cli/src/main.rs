// SPDX-License-Identifier: MIT

//! hashfleet: the operator CLI. Every subcommand builds its own ephemeral
//! in-process registry/job-store/control-plane rather than talking to a
//! running `hashfleetd` over a socket — this workspace has no transport
//! layer (spec.md §1 treats one as an external collaborator grafted onto
//! `ControlPlane::handle`), so each invocation is a self-contained preview
//! or probe against real production code paths instead of a live daemon.
//! See DESIGN.md for the tradeoff this implies.

mod commands;
mod exit_error;
mod output;

use clap::{Parser, Subcommand};
use exit_error::ExitError;
use output::OutputFormat;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "hashfleet", version, about = "Operator CLI for the hashfleet distributed cracking orchestrator")]
struct Cli {
    #[arg(long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Agent Registry (C3) and capability probe (C2) operations.
    #[command(subcommand)]
    Agent(commands::agent::AgentCommand),
    /// Pure partition-math preview of the Scheduler's proportional share.
    Partition {
        #[command(subcommand)]
        command: PartitionCommand,
    },
    /// Run input through the Progress Parser (C1).
    Parser {
        #[command(subcommand)]
        command: ParserCommand,
    },
    /// Count a wordlist's effective lines (Artifact Catalog rule, C8).
    Wordlist {
        #[command(subcommand)]
        command: WordlistCommand,
    },
    /// Run a Health Monitor sweep (C4) against synthetic heartbeat data.
    Health {
        #[command(subcommand)]
        command: HealthCommand,
    },
    /// Distribute a job across agents end to end (C5/C6).
    Job {
        #[command(subcommand)]
        command: JobCommand,
    },
}

#[derive(Debug, Subcommand)]
enum PartitionCommand {
    Preview(commands::partition::PartitionPreviewArgs),
}

#[derive(Debug, Subcommand)]
enum ParserCommand {
    Run(commands::parser::ParserRunArgs),
}

#[derive(Debug, Subcommand)]
enum WordlistCommand {
    LineCount(commands::wordlist::WordlistLineCountArgs),
}

#[derive(Debug, Subcommand)]
enum HealthCommand {
    Sweep(commands::health::HealthSweepArgs),
}

#[derive(Debug, Subcommand)]
enum JobCommand {
    Distribute(commands::job::JobDistributeArgs),
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}

async fn dispatch(cli: Cli) -> Result<(), ExitError> {
    match cli.command {
        Command::Agent(cmd) => commands::agent::run(cmd, cli.format).await,
        Command::Partition { command: PartitionCommand::Preview(args) } => commands::partition::run(args, cli.format),
        Command::Parser { command: ParserCommand::Run(args) } => commands::parser::run(args, cli.format),
        Command::Wordlist { command: WordlistCommand::LineCount(args) } => commands::wordlist::run(args, cli.format).await,
        Command::Health { command: HealthCommand::Sweep(args) } => commands::health::run(args, cli.format).await,
        Command::Job { command: JobCommand::Distribute(args) } => commands::job::run(args, cli.format).await,
    }
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();
    if let Err(e) = dispatch(cli).await {
        eprintln!("hashfleet: {e}");
        std::process::exit(e.code);
    }
}
