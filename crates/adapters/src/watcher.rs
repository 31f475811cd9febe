// SPDX-License-Identifier: MIT

//! Local-file watch task: rescans an upload directory and reports the
//! [`LocalFile`] set the agent currently holds, so `hf-agent::runtime` can
//! diff it against what it last advertised and resync with the control
//! plane only when the cardinality changes.

use crate::error::AdapterError;
use hf_core::{AgentId, ArtifactKind, LocalFile};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncReadExt;

pub async fn scan_local_files(
    agent_id: AgentId,
    dir: &Path,
    kind: ArtifactKind,
) -> Result<Vec<LocalFile>, AdapterError> {
    let mut out = Vec::new();
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(out),
        Err(e) => return Err(e.into()),
    };
    while let Some(entry) = entries.next_entry().await? {
        let metadata = entry.metadata().await?;
        if !metadata.is_file() {
            continue;
        }
        let filename = entry.file_name().to_string_lossy().into_owned();
        let size_bytes = metadata.len();
        let content_hash = hash_file(&entry.path()).await?;
        out.push(LocalFile { agent_id, filename, size_bytes, content_hash, kind });
    }
    Ok(out)
}

async fn hash_file(path: &Path) -> Result<String, AdapterError> {
    let mut file = fs::File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
