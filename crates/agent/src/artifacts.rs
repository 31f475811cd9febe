// SPDX-License-Identifier: MIT

//! Artifact resolution (spec §4.2 steps 1-2): prefer a local copy already
//! present in the agent's cache, falling back to a streamed download from
//! the Artifact Catalog. Downloads at or above a configurable threshold log
//! periodic progress instead of completing silently.

use crate::client::ControlPlaneClient;
use crate::error::AgentError;
use hf_adapters::{scan_local_files, AgentPaths};
use hf_core::{AgentId, Artifact, ArtifactId, ArtifactKind, JobId, WordlistRef};
use std::path::PathBuf;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub async fn resolve_hash_file(
    client: &dyn ControlPlaneClient,
    paths: &AgentPaths,
    agent_id: AgentId,
    large_download_threshold_bytes: u64,
    hash_file: ArtifactId,
) -> Result<PathBuf, AgentError> {
    localize(client, paths, agent_id, ArtifactKind::HashFile, hash_file, large_download_threshold_bytes).await
}

/// `WordlistRef::Inline` is materialized directly, keyed by job id, rather
/// than localized through the catalog — there is no artifact to look up.
pub async fn resolve_wordlist(
    client: &dyn ControlPlaneClient,
    paths: &AgentPaths,
    agent_id: AgentId,
    job_id: JobId,
    large_download_threshold_bytes: u64,
    wordlist: &WordlistRef,
) -> Result<PathBuf, AgentError> {
    match wordlist {
        WordlistRef::Catalog(id) => {
            localize(client, paths, agent_id, ArtifactKind::Wordlist, *id, large_download_threshold_bytes).await
        }
        WordlistRef::Inline(content) => {
            let path = paths.inline_wordlist(job_id);
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&path, content).await?;
            Ok(path)
        }
    }
}

async fn localize(
    client: &dyn ControlPlaneClient,
    paths: &AgentPaths,
    agent_id: AgentId,
    kind: ArtifactKind,
    artifact_id: ArtifactId,
    large_download_threshold_bytes: u64,
) -> Result<PathBuf, AgentError> {
    let dir = match kind {
        ArtifactKind::Wordlist => paths.wordlists_dir(),
        ArtifactKind::HashFile => paths.hash_files_dir(),
    };
    let local = scan_local_files(agent_id, &dir, kind).await?;

    // Cheap pre-download check: a previously-downloaded copy is named with
    // the artifact id, so a filename match needs no network round trip.
    if let Some(file) = local.iter().find(|f| f.filename.contains(artifact_id.as_str())) {
        return Ok(dir.join(&file.filename));
    }

    let (artifact, mut reader) = match kind {
        ArtifactKind::Wordlist => client.download_wordlist(artifact_id).await?,
        ArtifactKind::HashFile => client.download_hash_file(artifact_id).await?,
    };

    // The content-hash fallback catches a locally-present file that was
    // renamed or predates this agent's own download convention.
    if let Some(file) = local.iter().find(|f| f.satisfies(&artifact)) {
        return Ok(dir.join(&file.filename));
    }

    tokio::fs::create_dir_all(&dir).await?;
    let dest_path = dir.join(format!("{}-{}", artifact_id.as_str(), artifact.name));
    let mut dest = tokio::fs::File::create(&dest_path).await?;
    copy_localizing(&mut reader, &mut dest, &artifact, large_download_threshold_bytes).await?;
    Ok(dest_path)
}

async fn copy_localizing(
    reader: &mut (impl tokio::io::AsyncRead + Unpin),
    dest: &mut tokio::fs::File,
    artifact: &Artifact,
    large_download_threshold_bytes: u64,
) -> Result<(), AgentError> {
    if artifact.size_bytes < large_download_threshold_bytes {
        tokio::io::copy(reader, dest).await?;
        return Ok(());
    }

    let mut buf = [0u8; 64 * 1024];
    let mut copied: u64 = 0;
    let log_every = (artifact.size_bytes / 10).max(1);
    let mut next_log_at = log_every;
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        dest.write_all(&buf[..n]).await?;
        copied += n as u64;
        if copied >= next_log_at {
            tracing::info!(artifact_id = %artifact.id, copied, total = artifact.size_bytes, "downloading artifact");
            next_log_at = next_log_at.saturating_add(log_every);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "artifacts_tests.rs"]
mod tests;
