//! Application service: version check and self-update use-cases.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::ports::{EntryPointLinker, ProgressReporter, UpdateChecker, UpdateInfo};
use crate::domain::Settings;

/// Installed revision plus the upstream comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionReport {
    pub version: String,
    /// `None` when the install root is not a git checkout.
    pub revision: Option<String>,
    /// `None` when the upstream was not consulted.
    pub update: Option<UpdateInfo>,
}

/// Describe the install, optionally comparing it with upstream.
///
/// # Errors
///
/// Returns an error if `check_upstream` is set and either the revision
/// cannot be read or the fetch fails.
pub async fn version_report(
    checker: &impl UpdateChecker,
    check_upstream: bool,
) -> Result<VersionReport> {
    let revision = match checker.current_revision().await {
        Ok(rev) => Some(rev),
        Err(e) if !check_upstream => {
            tracing::debug!(error = %e, "install revision unavailable");
            None
        }
        Err(e) => return Err(e.context("reading installed revision")),
    };
    let update = if check_upstream {
        Some(checker.check().await.context("checking for updates")?)
    } else {
        None
    };
    Ok(VersionReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        revision,
        update,
    })
}

/// Pull the upstream revision and re-link the entry points.
///
/// Returns the links that were (re)created in the bin directory.
///
/// # Errors
///
/// Returns an error if the pull or any link fails.
pub async fn apply(
    checker: &impl UpdateChecker,
    linker: &impl EntryPointLinker,
    reporter: &impl ProgressReporter,
    settings: &Settings,
) -> Result<Vec<PathBuf>> {
    reporter.step("Pulling latest revision...");
    checker.pull().await.context("pulling latest revision")?;

    let source = settings.entry_point_dir();
    reporter.step(&format!("Linking entry points into {}", settings.bin_dir.display()));
    let links = linker
        .link_all(&source, &settings.bin_dir)
        .with_context(|| format!("linking entry points from {}", source.display()))?;

    let revision = checker.current_revision().await?;
    reporter.success(&format!("Updated to {revision}"));
    Ok(links)
}
