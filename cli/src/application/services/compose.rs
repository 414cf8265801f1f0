//! Application service: forward a classified command to the orchestration tool.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use anyhow::Result;

use crate::application::ports::{CommandRunner, CommandSpec, ProgressReporter};
use crate::domain::{Catalog, Invocation, Settings};

/// Run the orchestration tool for `invocation` and return its exit code.
///
/// Applications that resolved to nothing are reported as warnings before the
/// run. When a foreground `up` is interrupted, the stack is torn down with
/// [`cleanup_command`] after the tool exits; a failing cleanup is reported
/// but does not replace the primary exit code.
///
/// # Errors
///
/// Returns an error if the orchestration tool cannot be spawned.
pub async fn run(
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
    settings: &Settings,
    catalog: &Catalog,
    invocation: &Invocation,
) -> Result<i32> {
    for alias in &invocation.dropped_aliases {
        let missing = catalog.undeclared_members(alias);
        if missing.is_empty() {
            reporter.warn(&format!("Application '{alias}' lists no services; skipped"));
        } else {
            reporter.warn(&format!(
                "Application '{alias}' has no declared services (unknown: {}); skipped",
                missing.join(", ")
            ));
        }
    }

    let cmd = forward_command(settings, invocation);
    tracing::debug!(command = %cmd.display(), "forwarding to orchestration tool");
    let outcome = runner.run_foreground(&cmd).await?;
    tracing::debug!(code = outcome.code, interrupted = outcome.interrupted, "tool exited");

    if outcome.interrupted && invocation.is_foreground_up() {
        reporter.step("Interrupted, tearing down services...");
        let cleanup = cleanup_command(settings);
        tracing::debug!(command = %cleanup.display(), "running cleanup");
        match runner.run_foreground(&cleanup).await {
            Ok(done) if done.code == 0 => reporter.success("Services stopped"),
            Ok(done) => reporter.warn(&format!("Cleanup exited with code {}", done.code)),
            Err(e) => reporter.warn(&format!("Cleanup failed: {e:#}")),
        }
    }

    Ok(outcome.code)
}

/// The orchestration-tool command for `invocation`.
#[must_use]
pub fn forward_command(settings: &Settings, invocation: &Invocation) -> CommandSpec {
    CommandSpec::new(
        settings.compose.program.clone(),
        invocation.compose_args(&settings.compose),
    )
    .with_env(settings.child_env())
}

/// `down` for the whole project; `down -v` in test mode.
#[must_use]
pub fn cleanup_command(settings: &Settings) -> CommandSpec {
    let mut args = settings.compose.base_args();
    args.push("down".to_string());
    if settings.is_test() {
        args.push("-v".to_string());
    }
    CommandSpec::new(settings.compose.program.clone(), args).with_env(settings.child_env())
}
