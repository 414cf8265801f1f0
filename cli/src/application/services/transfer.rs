//! Application service: import/export of project volumes.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, CommandSpec, ProgressReporter};
use crate::domain::transfer::DOCKER_PROGRAM;
use crate::domain::{Catalog, Direction, Settings, TransferPlan};

/// Run the transfer container for `archive` and return its exit code.
///
/// `archive` must be absolute; for imports the caller has already checked
/// that it exists.
///
/// # Errors
///
/// Returns an error if the plan is invalid (no volumes, bad path) or
/// `docker` cannot be spawned.
pub async fn run(
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
    settings: &Settings,
    catalog: &Catalog,
    direction: Direction,
    archive: &Path,
) -> Result<i32> {
    let plan = TransferPlan::new(
        direction,
        archive,
        &settings.project_name(),
        &catalog.volumes,
        &settings.transfer_image,
    )?;

    let (verb, done) = match direction {
        Direction::Export => ("Exporting", "Exported"),
        Direction::Import => ("Importing", "Imported"),
    };
    reporter.step(&format!(
        "{verb} {} volume(s) via {}",
        plan.mounts.len(),
        plan.image
    ));

    let cmd = CommandSpec::new(DOCKER_PROGRAM, plan.docker_args());
    tracing::debug!(command = %cmd.display(), "running transfer container");
    let outcome = runner
        .run_foreground(&cmd)
        .await
        .context("running transfer container")?;

    if outcome.code == 0 {
        reporter.success(&format!("{done} {}", archive.display()));
    } else {
        reporter.warn(&format!("Transfer exited with code {}", outcome.code));
    }
    Ok(outcome.code)
}
