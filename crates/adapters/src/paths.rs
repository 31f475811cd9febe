// SPDX-License-Identifier: MIT

//! The upload-directory layout: `<root>/wordlists/`, `<root>/hash-files/`,
//! `<root>/temp/`, with per-job scratch files named `cracked-<job_id>.*`
//! and `wordlist-<job_id>.*`.

use hf_core::JobId;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct AgentPaths {
    root: PathBuf,
}

impl AgentPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn wordlists_dir(&self) -> PathBuf {
        self.root.join("wordlists")
    }

    pub fn hash_files_dir(&self) -> PathBuf {
        self.root.join("hash-files")
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.root.join("temp")
    }

    pub fn cracked_output(&self, job_id: JobId) -> PathBuf {
        self.temp_dir().join(format!("cracked-{job_id}.txt"))
    }

    pub fn inline_wordlist(&self, job_id: JobId) -> PathBuf {
        self.temp_dir().join(format!("wordlist-{job_id}.txt"))
    }

    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(self.wordlists_dir()).await?;
        tokio::fs::create_dir_all(self.hash_files_dir()).await?;
        tokio::fs::create_dir_all(self.temp_dir()).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
