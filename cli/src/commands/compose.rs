//! Forwarded orchestration-tool commands (`up`, `logs`, `ps`, ...).

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::CatalogSource;
use crate::application::services::compose;
use crate::commands::exit_status;
use crate::domain::classify;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlCatalogSource;

/// Classify `tokens`, expand applications and run the orchestration tool.
///
/// The tool's exit code becomes ours.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or the tool cannot be
/// spawned.
pub async fn run(app: &AppContext, tokens: &[String]) -> Result<ExitCode> {
    let catalog = YamlCatalogSource.load(&app.settings)?;
    let invocation = classify(tokens, &catalog);
    tracing::debug!(?invocation, "classified");

    let runner = TokioCommandRunner::default();
    let code = compose::run(
        &runner,
        &app.reporter(),
        &app.settings,
        &catalog,
        &invocation,
    )
    .await?;
    Ok(exit_status(code))
}
