//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

// ── Catalog errors ────────────────────────────────────────────────────────────

/// Errors raised while reading the topology and alias descriptors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(
        "Topology file not found: {}\n\nSet STEVEDORE_HOME to the directory holding docker-compose.yml.",
        .0.display()
    )]
    TopologyMissing(PathBuf),

    #[error(
        "Application file not found: {}\n\nCreate apps.yml next to docker-compose.yml (it may be empty).",
        .0.display()
    )]
    AliasFileMissing(PathBuf),

    #[error("Cannot read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

// ── Settings errors ───────────────────────────────────────────────────────────

/// Errors raised while resolving runtime settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Compose command is empty. Set STEVEDORE_COMPOSE or compose_command in config.yaml.")]
    EmptyComposeCommand,

    #[error("Unsupported DOCKER_HOST '{0}': only unix:// sockets are supported")]
    UnsupportedDockerHost(String),
}

// ── Transfer errors ───────────────────────────────────────────────────────────

/// Errors raised while planning an import or export.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("The topology declares no volumes; nothing to transfer.")]
    NoVolumes,

    #[error("Archive not found: {}", .0.display())]
    ArchiveNotFound(PathBuf),

    #[error("Invalid archive path: {}", .0.display())]
    InvalidArchivePath(PathBuf),
}

// ── Docker API errors ─────────────────────────────────────────────────────────

/// Errors raised by the container-runtime management socket client.
#[derive(Debug, Error)]
pub enum DockerApiError {
    #[error("Cannot connect to the Docker socket at {}: {reason}. Is the daemon running?", .path.display())]
    Connect { path: PathBuf, reason: String },

    #[error("Docker API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Docker API did not answer within {0}s")]
    Timeout(u64),

    #[error("Malformed Docker API response: {0}")]
    MalformedResponse(String),
}

// ── Update errors ─────────────────────────────────────────────────────────────

/// Errors raised by the version check and self-update.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("{} is not a git checkout; cannot update.", .0.display())]
    NotACheckout(PathBuf),

    #[error("`git {command}` failed: {stderr}")]
    Git { command: String, stderr: String },

    #[error("Unexpected output from `git {command}`: {output}")]
    UnexpectedOutput { command: String, output: String },
}
