//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`: never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

use crate::domain::{Catalog, ContainerSummary, Settings, UserConfig};

// ── Value Types ───────────────────────────────────────────────────────────────

/// A child process to run with inherited stdio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Extra environment for the child only.
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            env: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_env(mut self, env: Vec<(String, String)>) -> Self {
        self.env = env;
        self
    }

    /// The command line as a single display string.
    #[must_use]
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// How a foreground child ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Foreground {
    /// Exit code; `128 + signal` when killed by a signal.
    pub code: i32,
    /// An interrupt (Ctrl-C) arrived while the child was running.
    pub interrupted: bool,
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
    /// Run a program attached to the terminal until it exits.
    ///
    /// Interrupts are not fatal to the caller: they are recorded in the
    /// returned [`Foreground`] while the child handles them itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or waited on.
    async fn run_foreground(&self, cmd: &CommandSpec) -> Result<Foreground>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait: no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Configuration Ports ───────────────────────────────────────────────────────

/// Loads the per-user config file.
pub trait ConfigStore {
    /// Load the config, returning defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load(&self) -> Result<UserConfig>;
    /// Location of the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn path(&self) -> Result<PathBuf>;
}

/// Loads the topology and alias descriptors.
pub trait CatalogSource {
    /// Read both descriptors named by `settings`.
    ///
    /// # Errors
    ///
    /// Returns an error if either file is missing, unreadable or malformed.
    fn load(&self, settings: &Settings) -> Result<Catalog>;
}

// ── Container Runtime Port ────────────────────────────────────────────────────

/// Queries the container runtime for running-container metadata.
#[allow(async_fn_in_trait)]
pub trait ContainerInspector {
    /// List containers labelled with the compose project `project`.
    async fn list_containers(&self, project: &str) -> Result<Vec<ContainerSummary>>;
}

// ── Update Ports ──────────────────────────────────────────────────────────────

/// What the upstream has that the install does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpdateInfo {
    /// Upstream is ahead.
    Available {
        /// Commits the install is behind.
        behind: u32,
        /// Subjects of the newest pending commits (at most 5).
        notes: Vec<String>,
    },
    /// Already at the upstream revision.
    UpToDate,
}

/// Abstraction over the update backend, enabling test doubles.
#[allow(async_fn_in_trait)]
pub trait UpdateChecker {
    /// Short revision of the install.
    async fn current_revision(&self) -> Result<String>;
    /// Fetch upstream and compare.
    async fn check(&self) -> Result<UpdateInfo>;
    /// Fast-forward the install to upstream.
    async fn pull(&self) -> Result<()>;
}

/// Links the install's entry points into a bin directory.
pub trait EntryPointLinker {
    /// Link every executable in `source` into `target`, replacing stale
    /// links. Returns the links created.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be read or a link cannot be
    /// created.
    fn link_all(&self, source: &Path, target: &Path) -> Result<Vec<PathBuf>>;
}
