// SPDX-License-Identifier: MIT

//! Content-addressed byte storage backing the Artifact Catalog (C8).
//! `hf-storage::ArtifactCatalog` owns the metadata row; this type owns the
//! bytes on disk, laid out `<kind-dir>/<hash-prefix>/<hash>` so a repeated
//! upload of identical content writes to the same path.

use crate::error::AdapterError;
use crate::paths::AgentPaths;
use hf_core::ArtifactKind;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tokio::fs;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader};

pub struct ArtifactFileStore {
    paths: AgentPaths,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutOutcome {
    pub content_hash: String,
    pub size_bytes: u64,
    pub path: PathBuf,
}

impl ArtifactFileStore {
    pub fn new(paths: AgentPaths) -> Self {
        Self { paths }
    }

    fn kind_dir(&self, kind: ArtifactKind) -> PathBuf {
        match kind {
            ArtifactKind::Wordlist => self.paths.wordlists_dir(),
            ArtifactKind::HashFile => self.paths.hash_files_dir(),
        }
    }

    fn content_path(&self, kind: ArtifactKind, content_hash: &str) -> PathBuf {
        let prefix = &content_hash[..content_hash.len().min(2)];
        self.kind_dir(kind).join(prefix).join(content_hash)
    }

    /// Stream `reader` to a scratch file while hashing, then rename into the
    /// content-addressed layout. A second upload of identical bytes resolves
    /// to the same path without rewriting it.
    pub async fn put_stream(
        &self,
        kind: ArtifactKind,
        mut reader: impl AsyncRead + Unpin,
    ) -> Result<PutOutcome, AdapterError> {
        fs::create_dir_all(self.paths.temp_dir()).await?;
        let temp_path = self.paths.temp_dir().join(format!("upload-{}.part", uuid::Uuid::new_v4()));
        let mut temp_file = fs::File::create(&temp_path).await?;
        let mut hasher = Sha256::new();
        let mut buf = [0u8; 64 * 1024];
        let mut size_bytes = 0u64;
        loop {
            let n = reader.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
            temp_file.write_all(&buf[..n]).await?;
            size_bytes += n as u64;
        }
        temp_file.flush().await?;
        drop(temp_file);

        let content_hash = format!("{:x}", hasher.finalize());
        let dest_path = self.content_path(kind, &content_hash);
        // `content_path` always joins onto `self.root`, so it always has a parent.
        #[allow(clippy::expect_used)]
        fs::create_dir_all(dest_path.parent().expect("content path always has a parent")).await?;
        if fs::metadata(&dest_path).await.is_ok() {
            fs::remove_file(&temp_path).await.ok();
        } else {
            fs::rename(&temp_path, &dest_path).await?;
        }
        Ok(PutOutcome { content_hash, size_bytes, path: dest_path })
    }

    pub async fn open(&self, kind: ArtifactKind, content_hash: &str) -> Result<fs::File, AdapterError> {
        Ok(fs::File::open(self.content_path(kind, content_hash)).await?)
    }

    /// One streaming pass counting non-empty lines, ignoring trailing blank
    /// lines. Shared by upload-time and first-use computation so the logic
    /// is never duplicated.
    pub async fn count_lines(&self, kind: ArtifactKind, content_hash: &str) -> Result<u64, AdapterError> {
        let file = self.open(kind, content_hash).await?;
        let mut lines = BufReader::new(file).lines();
        let mut count = 0u64;
        while let Some(line) = lines.next_line().await? {
            if !line.trim().is_empty() {
                count += 1;
            }
        }
        Ok(count)
    }
}

#[cfg(test)]
#[path = "file_store_tests.rs"]
mod tests;
