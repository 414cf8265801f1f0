//! Unit tests for version reporting and self-update.

#![allow(clippy::expect_used)]

use std::path::PathBuf;

use stevedore_cli::application::UpdateInfo;
use stevedore_cli::application::services::update::{apply, version_report};

use crate::mocks::{FakeLinker, FakeUpdateChecker, RecordingReporter, settings};

fn available() -> UpdateInfo {
    UpdateInfo::Available {
        behind: 2,
        notes: vec!["Add search application".to_string(), "Fix ports".to_string()],
    }
}

#[tokio::test]
async fn test_version_report_without_upstream() {
    let checker = FakeUpdateChecker::new(available());
    let report = version_report(&checker, false).await.expect("report");
    assert_eq!(report.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(report.revision.as_deref(), Some("abc1234"));
    assert_eq!(report.update, None);
}

#[tokio::test]
async fn test_version_report_with_upstream() {
    let checker = FakeUpdateChecker::new(available());
    let report = version_report(&checker, true).await.expect("report");
    assert_eq!(report.update, Some(available()));
}

#[tokio::test]
async fn test_version_report_outside_checkout_has_no_revision() {
    let checker = FakeUpdateChecker::not_a_checkout();
    let report = version_report(&checker, false).await.expect("report");
    assert_eq!(report.revision, None);
}

#[tokio::test]
async fn test_version_check_outside_checkout_fails() {
    let checker = FakeUpdateChecker::not_a_checkout();
    let err = version_report(&checker, true).await.expect_err("no checkout");
    assert!(format!("{err:#}").contains("Not a git checkout"));
}

#[test]
fn test_update_info_json_shape() {
    let value = serde_json::to_value(available()).expect("json");
    assert_eq!(value["status"], "available");
    assert_eq!(value["behind"], 2);
    assert_eq!(
        serde_json::to_value(UpdateInfo::UpToDate).expect("json"),
        serde_json::json!({ "status": "up_to_date" })
    );
}

#[tokio::test]
async fn test_apply_pulls_and_relinks_entry_points() {
    let checker = FakeUpdateChecker::new(available()).with_revisions(&["def5678"]);
    let linker = FakeLinker {
        names: vec!["stevedore"],
        ..FakeLinker::default()
    };
    let reporter = RecordingReporter::default();
    let settings = settings(false);

    let links = apply(&checker, &linker, &reporter, &settings)
        .await
        .expect("apply");

    assert!(*checker.pulled.borrow());
    assert_eq!(
        linker.linked.borrow().clone(),
        Some((
            PathBuf::from("/opt/catalog/bin"),
            PathBuf::from("/home/dev/.local/bin")
        ))
    );
    assert_eq!(links, vec![PathBuf::from("/home/dev/.local/bin/stevedore")]);
    assert_eq!(reporter.messages("success"), ["Updated to def5678"]);
}
