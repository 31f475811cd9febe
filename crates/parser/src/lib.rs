// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hf-parser: the cracker's progress parser (C1), extracted into its own
//! leaf crate with zero I/O dependencies so it can be property-tested
//! against synthetic output corpora without spawning anything.
//!
//! The parser is chunk-stateless: [`parse_chunk`] re-scans each buffer as
//! independent text and carries no state between calls. False negatives
//! across a read-buffer boundary (a progress line split mid-line by the
//! underlying pipe) are an accepted tradeoff for staying allocation-light
//! and stateless.

mod record;
mod scanner;

pub use record::ProgressRecord;
pub use scanner::{parse_chunk, ChunkScanner};
