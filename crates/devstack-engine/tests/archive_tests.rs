//! Archive installer tests
//!
//! Tests cover:
//! - Flattening a single wrapper folder
//! - Leaving archives without a common folder untouched
//! - Wrapper folders containing a child of the same name
//! - Entries written with a leading `./`
//! - Rejecting entries that escape the target directory
//! - Temporary zip clean-up

mod common;

use common::*;
use devstack_engine::archive;
use devstack_engine::{InstallOperation, InstallState, InstallStrategy};
use std::fs;
use tempfile::TempDir;
use wiremock::MockServer;

/// Run the archive installer for `x 1.0` against a served zip
async fn install_zip(zip: Vec<u8>) -> (TempDir, InstallOperation, Vec<devstack_engine::InstallWarning>) {
    let server = MockServer::start().await;
    mock_download(&server, X_ZIP_PATH, &zip).await;

    let temp = TempDir::new().unwrap();
    let tool_dir = temp.path().join(X_NAME);
    let target = tool_dir.join("x-1.0");
    fs::create_dir_all(&target).unwrap();

    let mut op = InstallOperation::new(X_NAME, X_VERSION, target, InstallStrategy::Archive);
    op.advance(InstallState::DirectoryCreated);

    let zip_path = archive::temp_archive_path(&tool_dir, X_NAME, X_VERSION);
    let warnings = archive::install(
        &test_fetcher(),
        &test_install_config(),
        &mut op,
        &url_for(&server, X_ZIP_PATH),
        &zip_path,
    )
    .await
    .unwrap();

    (temp, op, warnings)
}

#[tokio::test]
async fn test_single_top_level_folder_is_flattened() {
    let (temp, op, warnings) = install_zip(wrapped_x_zip()).await;
    let target = temp.path().join("x/x-1.0");

    assert!(warnings.is_empty());
    assert_eq!(op.state(), InstallState::Materialized);
    assert_eq!(op.top_level_folder(), Some("x-1.0"));
    assert!(target.join("bin/x.exe").is_file());
    assert!(target.join("README.txt").is_file());
    assert!(!target.join("x-1.0").exists());
}

#[tokio::test]
async fn test_archive_without_common_folder_is_not_flattened() {
    let (temp, op, _) = install_zip(flat_x_zip()).await;
    let target = temp.path().join("x/x-1.0");

    assert_eq!(op.top_level_folder(), None);
    assert!(target.join("x.exe").is_file());
    assert!(target.join("lib/x.dll").is_file());
}

#[tokio::test]
async fn test_first_entry_folder_not_shared_by_all_entries_is_kept() {
    let zip = ZipBuilder::new()
        .file("bin/tool.exe", FAKE_EXE)
        .file("LICENSE", b"MIT")
        .build();
    let (temp, op, _) = install_zip(zip).await;
    let target = temp.path().join("x/x-1.0");

    assert_eq!(op.top_level_folder(), None);
    assert!(target.join("bin/tool.exe").is_file());
    assert!(target.join("LICENSE").is_file());
}

#[tokio::test]
async fn test_current_dir_prefixed_entries_are_not_treated_as_wrapper() {
    let zip = ZipBuilder::new()
        .file("./x.exe", FAKE_EXE)
        .file("./lib/x.dll", b"dll")
        .build();
    let (temp, op, warnings) = install_zip(zip).await;
    let target = temp.path().join("x/x-1.0");

    assert!(warnings.is_empty());
    assert_eq!(op.state(), InstallState::Materialized);
    assert_eq!(op.top_level_folder(), None);
    assert!(target.join("x.exe").is_file());
    assert!(target.join("lib/x.dll").is_file());
}

#[tokio::test]
async fn test_wrapper_with_same_named_child_is_flattened() {
    let zip = ZipBuilder::new()
        .dir("phpMyAdmin")
        .file("phpMyAdmin/index.php", b"<?php")
        .file("phpMyAdmin/phpMyAdmin/nested.txt", b"nested")
        .build();
    let (temp, op, _) = install_zip(zip).await;
    let target = temp.path().join("x/x-1.0");

    assert_eq!(op.top_level_folder(), Some("phpMyAdmin"));
    assert!(target.join("index.php").is_file());
    assert!(target.join("phpMyAdmin/nested.txt").is_file());
}

#[tokio::test]
async fn test_escaping_entries_are_skipped() {
    let zip = ZipBuilder::new()
        .file("safe.txt", b"ok")
        .file("../escaped.txt", b"nope")
        .build();
    let (temp, _, _) = install_zip(zip).await;

    assert!(temp.path().join("x/x-1.0/safe.txt").is_file());
    assert!(!temp.path().join("x/escaped.txt").exists());
}

#[tokio::test]
async fn test_temporary_zip_is_deleted() {
    let (temp, op, warnings) = install_zip(wrapped_x_zip()).await;

    assert!(warnings.is_empty());
    assert_eq!(
        op.download_path(),
        Some(temp.path().join("x/x-1.0.zip").as_path())
    );
    assert!(!temp.path().join("x/x-1.0.zip").exists());
    assert!(op.bytes_downloaded() > 0);
}
