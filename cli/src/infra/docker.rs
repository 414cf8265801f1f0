//! `ContainerInspector` backed by the Docker Engine API.
//!
//! Talks to the local management socket through `bollard` and converts its
//! models into the domain's `ContainerSummary`.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use bollard::Docker;
use bollard::container::ListContainersOptions;
use bollard::models;

use crate::application::ports::ContainerInspector;
use crate::domain::error::DockerApiError;
use crate::domain::port_map::{PROJECT_LABEL, PortBinding};
use crate::domain::ContainerSummary;

/// Upper bound for one API request.
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(10);

/// `ContainerInspector` backed by the Docker management socket.
pub struct DockerSocket {
    path: PathBuf,
    timeout: Duration,
}

impl DockerSocket {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            timeout: DEFAULT_API_TIMEOUT,
        }
    }

    fn client(&self) -> Result<Docker, DockerApiError> {
        Docker::connect_with_unix(
            &self.path.to_string_lossy(),
            self.timeout.as_secs(),
            bollard::API_DEFAULT_VERSION,
        )
        .map_err(|e| self.api_error(e))
    }

    fn api_error(&self, err: bollard::errors::Error) -> DockerApiError {
        use bollard::errors::Error as E;
        match err {
            E::DockerResponseServerError {
                status_code,
                message,
            } => DockerApiError::Status {
                status: status_code,
                body: message,
            },
            E::RequestTimeoutError { .. } => DockerApiError::Timeout(self.timeout.as_secs()),
            e @ (E::JsonDataError { .. } | E::JsonSerdeError { .. }) => {
                DockerApiError::MalformedResponse(e.to_string())
            }
            e => DockerApiError::Connect {
                path: self.path.clone(),
                reason: e.to_string(),
            },
        }
    }
}

impl ContainerInspector for DockerSocket {
    async fn list_containers(&self, project: &str) -> Result<Vec<ContainerSummary>> {
        let docker = self.client()?;
        tracing::debug!(socket = %self.path.display(), project, "listing containers");
        let containers = docker
            .list_containers(Some(project_filter(project)))
            .await
            .map_err(|e| self.api_error(e))?;
        Ok(containers.into_iter().map(summary).collect())
    }
}

/// Running containers labelled with the compose project `project`.
#[must_use]
pub fn project_filter(project: &str) -> ListContainersOptions<String> {
    ListContainersOptions {
        filters: HashMap::from([(
            "label".to_string(),
            vec![format!("{PROJECT_LABEL}={project}")],
        )]),
        ..Default::default()
    }
}

fn summary(container: models::ContainerSummary) -> ContainerSummary {
    ContainerSummary {
        names: container.names.unwrap_or_default(),
        ports: container
            .ports
            .unwrap_or_default()
            .into_iter()
            .map(|p| PortBinding {
                private_port: p.private_port,
                public_port: p.public_port,
                protocol: p
                    .typ
                    .map(|t| t.to_string())
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| "tcp".to_string()),
            })
            .collect(),
        labels: container
            .labels
            .unwrap_or_default()
            .into_iter()
            .collect::<BTreeMap<_, _>>(),
    }
}
