// SPDX-License-Identifier: MIT

//! `hashfleet wordlist line-count` — the same one-streaming-pass counting
//! rule the Artifact Catalog uses (spec §4.8: "line counting ignores
//! trailing empty lines"), run directly against a plain path rather than a
//! content-addressed artifact file.

use crate::exit_error::ExitError;
use crate::output::{print_value, OutputFormat};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Args)]
pub struct WordlistLineCountArgs {
    path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
struct LineCount {
    path: PathBuf,
    line_count: u64,
}

pub async fn run(args: WordlistLineCountArgs, format: OutputFormat) -> Result<(), ExitError> {
    let file = tokio::fs::File::open(&args.path)
        .await
        .map_err(|e| ExitError::new(1, format!("failed to open {}: {e}", args.path.display())))?;
    let mut lines = BufReader::new(file).lines();
    let mut count = 0u64;
    while let Some(line) =
        lines.next_line().await.map_err(|e| ExitError::new(1, format!("failed to read {}: {e}", args.path.display())))?
    {
        if !line.trim().is_empty() {
            count += 1;
        }
    }
    let result = LineCount { path: args.path, line_count: count };
    match format {
        OutputFormat::Json => print_value(&result, format),
        OutputFormat::Text => println!("{}", result.line_count),
    }
    Ok(())
}
