//! Published-port report built from container-runtime metadata.
//!
//! Pure functions only: the socket client lives in `crate::infra::docker`.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Compose label carrying the service name; used when the container name
/// does not follow the `<project>_<service>_<n>` convention.
pub const SERVICE_LABEL: &str = "com.docker.compose.service";

/// Compose label carrying the project name; used to filter containers.
pub const PROJECT_LABEL: &str = "com.docker.compose.project";

/// One entry of `GET /containers/json`. Only the fields this tool reads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerSummary {
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub ports: Vec<PortBinding>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PortBinding {
    pub private_port: u16,
    #[serde(default)]
    pub public_port: Option<u16>,
    #[serde(rename = "Type", default = "default_protocol")]
    pub protocol: String,
}

fn default_protocol() -> String {
    "tcp".to_string()
}

/// Derive a service name from a container name.
///
/// Strips the leading `/`, the `<project>` prefix with one `_` or `-`
/// separator, and a trailing replica number (`_1`, `-2`). Returns `None` when
/// the name does not start with the project prefix.
#[must_use]
pub fn service_name(container: &str, project: &str) -> Option<String> {
    let pattern = format!(r"^/?{}[_-](.+?)(?:[_-]\d+)?$", regex::escape(project));
    let re = Regex::new(&pattern).ok()?;
    re.captures(container)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Service name → (`"<port>/<proto>"` → published host port).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PortReport(pub BTreeMap<String, BTreeMap<String, u16>>);

impl PortReport {
    /// Build the report for containers of `project`.
    ///
    /// Containers whose service cannot be determined are skipped. Services
    /// without published ports appear with an empty mapping.
    #[must_use]
    pub fn from_containers(containers: &[ContainerSummary], project: &str) -> Self {
        let mut report = BTreeMap::<String, BTreeMap<String, u16>>::new();
        for container in containers {
            let Some(service) = container
                .names
                .iter()
                .find_map(|n| service_name(n, project))
                .or_else(|| container.labels.get(SERVICE_LABEL).cloned())
            else {
                continue;
            };
            let entry = report.entry(service).or_default();
            for port in &container.ports {
                if let Some(public) = port.public_port {
                    entry.insert(format!("{}/{}", port.private_port, port.protocol), public);
                }
            }
        }
        Self(report)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flattened `(service, internal, published)` rows in sorted order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &str, u16)> {
        self.0.iter().flat_map(|(service, ports)| {
            ports
                .iter()
                .map(move |(internal, public)| (service.as_str(), internal.as_str(), *public))
        })
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
