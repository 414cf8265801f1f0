//! Unit tests for volume import/export.

#![allow(clippy::expect_used)]

use std::path::Path;

use stevedore_cli::application::services::transfer;
use stevedore_cli::domain::{AliasMap, Catalog, Direction, TransferError};

use crate::mocks::{RecordingReporter, RecordingRunner, catalog, settings};

#[tokio::test]
async fn test_export_runs_transfer_container() {
    let runner = RecordingRunner::new();
    let reporter = RecordingReporter::default();

    let code = transfer::run(
        &runner,
        &reporter,
        &settings(false),
        &catalog(),
        Direction::Export,
        Path::new("/backups/catalog-export.tar.gz"),
    )
    .await
    .expect("export");

    assert_eq!(code, 0);
    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "docker");
    assert_eq!(
        calls[0].args,
        [
            "run",
            "--rm",
            "-v",
            "catalog_data:/volumes/data",
            "-v",
            "catalog_index:/volumes/index",
            "-v",
            "/backups:/transfer",
            "busybox:stable",
            "tar",
            "czf",
            "/transfer/catalog-export.tar.gz",
            "-C",
            "/volumes",
            "."
        ]
    );
    assert_eq!(
        reporter.messages("success"),
        ["Exported /backups/catalog-export.tar.gz"]
    );
}

#[tokio::test]
async fn test_import_mounts_archive_read_only_in_test_project() {
    let runner = RecordingRunner::new();
    let reporter = RecordingReporter::default();

    transfer::run(
        &runner,
        &reporter,
        &settings(true),
        &catalog(),
        Direction::Import,
        Path::new("/backups/snap.tar.gz"),
    )
    .await
    .expect("import");

    let args = &runner.calls()[0].args;
    assert!(args.contains(&"catalog_test_data:/volumes/data".to_string()));
    assert!(args.contains(&"/backups:/transfer:ro".to_string()));
    assert!(args.contains(&"xzf".to_string()));
    assert_ne!(args.last().map(String::as_str), Some("."));
}

#[tokio::test]
async fn test_failed_container_exit_code_is_returned_with_warning() {
    let runner = RecordingRunner::new().then_exit(2, false);
    let reporter = RecordingReporter::default();

    let code = transfer::run(
        &runner,
        &reporter,
        &settings(false),
        &catalog(),
        Direction::Export,
        Path::new("/tmp/out.tar.gz"),
    )
    .await
    .expect("export");

    assert_eq!(code, 2);
    assert_eq!(reporter.messages("warn"), ["Transfer exited with code 2"]);
}

#[tokio::test]
async fn test_no_volumes_is_refused_before_running() {
    let runner = RecordingRunner::new();
    let reporter = RecordingReporter::default();
    let bare = Catalog::new(AliasMap::default(), ["db"].into_iter().collect(), Vec::new());

    let err = transfer::run(
        &runner,
        &reporter,
        &settings(false),
        &bare,
        Direction::Export,
        Path::new("/tmp/out.tar.gz"),
    )
    .await
    .expect_err("no volumes");

    assert!(matches!(
        err.downcast_ref::<TransferError>(),
        Some(TransferError::NoVolumes)
    ));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_relative_archive_is_rejected() {
    let runner = RecordingRunner::new();
    let reporter = RecordingReporter::default();

    let err = transfer::run(
        &runner,
        &reporter,
        &settings(false),
        &catalog(),
        Direction::Import,
        Path::new("relative.tar.gz"),
    )
    .await
    .expect_err("relative path");

    assert!(matches!(
        err.downcast_ref::<TransferError>(),
        Some(TransferError::InvalidArchivePath(_))
    ));
}
