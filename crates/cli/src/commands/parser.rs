// SPDX-License-Identifier: MIT

//! `hashfleet parser run` — feed a file (or stdin) through the Progress
//! Parser (C1, `hf_parser::parse_chunk`) line by line and print every
//! emitted record. The parser is chunk-stateless (spec §4.6): each line is
//! scanned as an independent buffer, exactly the way the agent's stdout/
//! stderr stream consumers call it per line (see `hf_agent::job_runner`).

use crate::exit_error::ExitError;
use crate::output::{print_value, OutputFormat};
use clap::Args;
use std::io::Read;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Args)]
pub struct ParserRunArgs {
    /// File to scan; reads stdin when omitted.
    #[arg(long)]
    file: Option<PathBuf>,
}

pub fn run(args: ParserRunArgs, format: OutputFormat) -> Result<(), ExitError> {
    let text = match args.file {
        Some(path) => std::fs::read_to_string(&path)
            .map_err(|e| ExitError::new(1, format!("failed to read {}: {e}", path.display())))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| ExitError::new(1, format!("failed to read stdin: {e}")))?;
            buf
        }
    };

    let now_epoch_ms = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64;
    let records: Vec<_> = text.lines().filter_map(|line| hf_parser::parse_chunk(line, now_epoch_ms)).collect();
    if records.is_empty() {
        return Ok(());
    }
    match format {
        OutputFormat::Json => print_value(&records, format),
        OutputFormat::Text => {
            for record in &records {
                let speed = record.speed_hps.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string());
                let eta = record.eta_epoch_ms.map(|e| e.to_string()).unwrap_or_else(|| "-".to_string());
                println!("progress={:<6.2}% speed={speed:<12} eta_epoch_ms={eta}", record.progress_pct);
            }
        }
    }
    Ok(())
}
