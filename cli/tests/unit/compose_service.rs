//! Unit tests for the forwarded compose run, using mocked runners.

#![allow(clippy::expect_used)]

use stevedore_cli::application::services::compose::{self, cleanup_command, forward_command};
use stevedore_cli::domain::classify;

use crate::mocks::{RecordingReporter, RecordingRunner, catalog, settings};

#[tokio::test]
async fn test_forwards_expanded_command_with_project_env() {
    let runner = RecordingRunner::new();
    let reporter = RecordingReporter::default();
    let settings = settings(false);
    let catalog = catalog();
    let inv = classify(&["up", "-d", "search", "extra"], &catalog);

    let code = compose::run(&runner, &reporter, &settings, &catalog, &inv)
        .await
        .expect("run");

    assert_eq!(code, 0);
    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "docker-compose");
    assert_eq!(
        calls[0].args,
        [
            "-f",
            "/opt/catalog/docker-compose.yml",
            "up",
            "-d",
            "solr",
            "indexer",
            "extra"
        ]
    );
    assert_eq!(
        calls[0].env,
        vec![("COMPOSE_PROJECT_NAME".to_string(), "catalog".to_string())]
    );
}

#[tokio::test]
async fn test_exit_code_is_propagated() {
    let runner = RecordingRunner::new().then_exit(3, false);
    let reporter = RecordingReporter::default();
    let catalog = catalog();
    let inv = classify(&["ps"], &catalog);

    let code = compose::run(&runner, &reporter, &settings(false), &catalog, &inv)
        .await
        .expect("run");
    assert_eq!(code, 3);
}

#[tokio::test]
async fn test_spawn_failure_is_an_error() {
    let runner = RecordingRunner::new().then(Err(anyhow::anyhow!("failed to spawn docker-compose")));
    let reporter = RecordingReporter::default();
    let catalog = catalog();
    let inv = classify(&["ps"], &catalog);

    let err = compose::run(&runner, &reporter, &settings(false), &catalog, &inv)
        .await
        .expect_err("spawn failure");
    assert!(err.to_string().contains("failed to spawn"));
}

#[tokio::test]
async fn test_interrupted_foreground_up_runs_cleanup() {
    let runner = RecordingRunner::new().then_exit(130, true).then_exit(0, false);
    let reporter = RecordingReporter::default();
    let settings = settings(false);
    let catalog = catalog();
    let inv = classify(&["up", "web"], &catalog);

    let code = compose::run(&runner, &reporter, &settings, &catalog, &inv)
        .await
        .expect("run");

    assert_eq!(code, 130, "primary exit code wins");
    let calls = runner.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1], cleanup_command(&settings));
    assert_eq!(calls[1].args.last().map(String::as_str), Some("down"));
    assert_eq!(reporter.messages("success"), ["Services stopped"]);
}

#[tokio::test]
async fn test_interrupted_up_in_test_mode_removes_volumes() {
    let runner = RecordingRunner::new().then_exit(130, true);
    let reporter = RecordingReporter::default();
    let settings = settings(true);
    let catalog = catalog();
    let inv = classify(&["up", "web"], &catalog);

    compose::run(&runner, &reporter, &settings, &catalog, &inv)
        .await
        .expect("run");

    let calls = runner.calls();
    assert_eq!(
        calls[1].args,
        ["-f", "/opt/catalog/docker-compose.test.yml", "down", "-v"]
    );
    assert_eq!(
        calls[1].env,
        vec![("COMPOSE_PROJECT_NAME".to_string(), "catalog_test".to_string())]
    );
}

#[tokio::test]
async fn test_interrupted_detached_up_skips_cleanup() {
    let runner = RecordingRunner::new().then_exit(130, true);
    let reporter = RecordingReporter::default();
    let catalog = catalog();
    let inv = classify(&["up", "-d", "web"], &catalog);

    compose::run(&runner, &reporter, &settings(false), &catalog, &inv)
        .await
        .expect("run");
    assert_eq!(runner.calls().len(), 1);
}

#[tokio::test]
async fn test_interrupted_logs_skips_cleanup() {
    let runner = RecordingRunner::new().then_exit(130, true);
    let reporter = RecordingReporter::default();
    let catalog = catalog();
    let inv = classify(&["logs", "-f", "solr"], &catalog);

    compose::run(&runner, &reporter, &settings(false), &catalog, &inv)
        .await
        .expect("run");
    assert_eq!(runner.calls().len(), 1);
}

#[tokio::test]
async fn test_failed_cleanup_is_a_warning() {
    let runner = RecordingRunner::new()
        .then_exit(130, true)
        .then_exit(1, false);
    let reporter = RecordingReporter::default();
    let catalog = catalog();
    let inv = classify(&["up", "web"], &catalog);

    let code = compose::run(&runner, &reporter, &settings(false), &catalog, &inv)
        .await
        .expect("run");

    assert_eq!(code, 130);
    assert!(
        reporter
            .messages("warn")
            .iter()
            .any(|m| m.contains("Cleanup exited with code 1"))
    );
}

#[tokio::test]
async fn test_dropped_applications_are_reported() {
    let runner = RecordingRunner::new();
    let reporter = RecordingReporter::default();
    let catalog = catalog();
    let inv = classify(&["up", "ghost", "empty", "web"], &catalog);

    compose::run(&runner, &reporter, &settings(false), &catalog, &inv)
        .await
        .expect("run");

    let warnings = reporter.messages("warn");
    assert_eq!(warnings.len(), 2);
    assert!(warnings.iter().any(|w| w.contains("'ghost'") && w.contains("missing, gone")));
    assert!(warnings.iter().any(|w| w.contains("'empty' lists no services")));
    assert_eq!(
        runner.calls()[0].args.last().map(String::as_str),
        Some("web"),
        "dropped applications are not forwarded"
    );
}

#[test]
fn test_forward_command_with_multi_word_tool() {
    let settings = stevedore_cli::domain::Settings::resolve(
        std::path::PathBuf::from("/srv/stack"),
        None,
        stevedore_cli::domain::UserConfig::default(),
        |k| (k == "STEVEDORE_COMPOSE").then(|| "docker compose".to_string()),
        false,
    )
    .expect("settings");
    let inv = classify(&["ps"], &catalog());

    let cmd = forward_command(&settings, &inv);
    assert_eq!(cmd.program, "docker");
    assert_eq!(cmd.args, ["compose", "-f", "/srv/stack/docker-compose.yml", "ps"]);
}
