//! Application service: published-port report for the current project.

use anyhow::{Context, Result};

use crate::application::ports::ContainerInspector;
use crate::domain::{PortReport, Settings};

/// Query the runtime for the project's containers and build the report.
///
/// # Errors
///
/// Returns an error if the container runtime cannot be queried.
pub async fn collect(
    inspector: &impl ContainerInspector,
    settings: &Settings,
) -> Result<PortReport> {
    let project = settings.project_name();
    let containers = inspector
        .list_containers(&project)
        .await
        .context("querying running containers")?;
    tracing::debug!(project = %project, count = containers.len(), "listed containers");
    Ok(PortReport::from_containers(&containers, &project))
}
