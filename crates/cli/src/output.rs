// SPDX-License-Identifier: MIT

//! Text/JSON output switching shared by every subcommand.

use clap::ValueEnum;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print a single value, pretty JSON or a `Debug`-shaped fallback for text
/// mode (commands that need a richer text rendering print it themselves
/// instead of calling this).
pub fn print_value<T: Serialize + std::fmt::Debug>(value: &T, format: OutputFormat) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("hashfleet: failed to serialize output: {e}"),
        },
        OutputFormat::Text => println!("{value:#?}"),
    }
}
