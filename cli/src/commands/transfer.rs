//! `stevedore import` / `stevedore export`: move volume data through an archive.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::CatalogSource;
use crate::application::services::transfer;
use crate::commands::exit_status;
use crate::domain::Direction;
use crate::domain::error::TransferError;
use crate::domain::transfer::default_export_name;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlCatalogSource;

/// Arguments for the import command.
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Archive produced by `stevedore export`
    pub file: PathBuf,
}

/// Arguments for the export command.
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Archive to write [default: <project>-export.tar.gz]
    pub file: Option<PathBuf>,
}

/// Run `stevedore import FILE`.
///
/// # Errors
///
/// Returns an error if the archive does not exist, the catalog declares no
/// volumes, or `docker` cannot be spawned.
pub async fn import(app: &AppContext, args: &ImportArgs) -> Result<ExitCode> {
    let archive = absolute(&args.file)?;
    if !archive.is_file() {
        return Err(TransferError::ArchiveNotFound(archive).into());
    }
    let archive = archive
        .canonicalize()
        .with_context(|| format!("cannot resolve {}", archive.display()))?;
    run(app, Direction::Import, &archive).await
}

/// Run `stevedore export [FILE]`.
///
/// # Errors
///
/// Returns an error if the catalog declares no volumes or `docker` cannot be
/// spawned.
pub async fn export(app: &AppContext, args: &ExportArgs) -> Result<ExitCode> {
    let file = args
        .file
        .clone()
        .unwrap_or_else(|| PathBuf::from(default_export_name(&app.settings.project_name())));
    let archive = absolute(&file)?;
    run(app, Direction::Export, &archive).await
}

async fn run(app: &AppContext, direction: Direction, archive: &Path) -> Result<ExitCode> {
    let catalog = YamlCatalogSource.load(&app.settings)?;
    let runner = TokioCommandRunner::default();
    let code = transfer::run(
        &runner,
        &app.reporter(),
        &app.settings,
        &catalog,
        direction,
        archive,
    )
    .await?;
    Ok(exit_status(code))
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("cannot resolve {}", path.display()))
}
