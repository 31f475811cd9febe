// SPDX-License-Identifier: MIT

use super::*;
use hf_core::AgentId;
use tokio::io::AsyncWriteExt;

#[tokio::test]
async fn scan_reports_every_regular_file_with_its_hash() {
    let dir = tempfile::tempdir().unwrap();
    let mut file = fs::File::create(dir.path().join("wordlist.txt")).await.unwrap();
    file.write_all(b"a\nb\npassword\n").await.unwrap();
    drop(file);

    let agent_id = AgentId::new();
    let files = scan_local_files(agent_id, dir.path(), ArtifactKind::Wordlist).await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].filename, "wordlist.txt");
    assert_eq!(files[0].agent_id, agent_id);
    assert!(!files[0].content_hash.is_empty());
}

#[tokio::test]
async fn scan_of_missing_directory_returns_empty() {
    let agent_id = AgentId::new();
    let files = scan_local_files(agent_id, std::path::Path::new("/does/not/exist"), ArtifactKind::Wordlist)
        .await
        .unwrap();
    assert!(files.is_empty());
}

#[tokio::test]
async fn identical_content_hashes_identically() {
    let dir = tempfile::tempdir().unwrap();
    let mut a = fs::File::create(dir.path().join("a.txt")).await.unwrap();
    a.write_all(b"same").await.unwrap();
    drop(a);
    let mut b = fs::File::create(dir.path().join("b.txt")).await.unwrap();
    b.write_all(b"same").await.unwrap();
    drop(b);

    let files = scan_local_files(AgentId::new(), dir.path(), ArtifactKind::Wordlist).await.unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].content_hash, files[1].content_hash);
}
