//! `stevedore ports`: published ports of the project's running containers.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::port_report;
use crate::infra::docker::DockerSocket;
use crate::output::json;

/// Run `stevedore ports`.
///
/// # Errors
///
/// Returns an error if the Docker socket cannot be queried.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let socket = DockerSocket::new(app.settings.docker_socket.clone());
    let report = port_report::collect(&socket, &app.settings).await?;
    if app.is_json() {
        println!("{}", json::format_value(&report)?);
    } else {
        app.renderer()
            .render_port_report(&app.settings.project_name(), &report);
    }
    Ok(ExitCode::SUCCESS)
}
