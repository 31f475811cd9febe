// SPDX-License-Identifier: MIT

//! Append-only write-ahead log. Every mutating storage operation appends one
//! JSON line here before (or alongside) updating the in-memory index, so a
//! crash between the two can be repaired by replaying [`Wal::next_unprocessed`]
//! against the last snapshot on the next startup.

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalError {
    #[error("wal I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("wal record malformed: {0}")]
    Corrupt(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Envelope<T> {
    seq: u64,
    payload: T,
}

pub struct Wal {
    path: PathBuf,
    file: Mutex<File>,
    next_seq: AtomicU64,
}

impl Wal {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, WalError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let next_seq = Self::scan_max_seq(&path)? + 1;
        Ok(Self { path, file: Mutex::new(file), next_seq: AtomicU64::new(next_seq) })
    }

    fn scan_max_seq(path: &Path) -> Result<u64, WalError> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let mut max_seq = 0u64;
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let value: serde_json::Value =
                serde_json::from_str(&line).map_err(|e| WalError::Corrupt(e.to_string()))?;
            if let Some(seq) = value.get("seq").and_then(|v| v.as_u64()) {
                max_seq = max_seq.max(seq);
            }
        }
        Ok(max_seq)
    }

    /// Append one entry, returning the sequence number assigned to it.
    pub fn append<T: Serialize>(&self, payload: &T) -> Result<u64, WalError> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        let value = serde_json::json!({ "seq": seq, "payload": payload });
        let line = serde_json::to_string(&value).map_err(|e| WalError::Corrupt(e.to_string()))?;
        let mut file = self.file.lock();
        writeln!(file, "{line}")?;
        Ok(seq)
    }

    pub fn flush(&self) -> Result<(), WalError> {
        self.file.lock().flush()?;
        Ok(())
    }

    /// Every record with `seq > after`, ascending — the replay set a fresh
    /// snapshot needs to catch up to the live log.
    pub fn next_unprocessed<T: DeserializeOwned>(&self, after: u64) -> Result<Vec<(u64, T)>, WalError> {
        self.flush()?;
        let file = File::open(&self.path)?;
        let mut out = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let envelope: Envelope<T> =
                serde_json::from_str(&line).map_err(|e| WalError::Corrupt(e.to_string()))?;
            if envelope.seq > after {
                out.push((envelope.seq, envelope.payload));
            }
        }
        out.sort_by_key(|(seq, _)| *seq);
        Ok(out)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
