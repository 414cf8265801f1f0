//! Runtime settings, resolved once at startup and immutable afterwards.
//!
//! Pure functions only: environment lookups are injected as a closure so the
//! resolution order can be tested without touching the process environment.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::error::SettingsError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const TOPOLOGY_FILE: &str = "docker-compose.yml";
pub const TEST_TOPOLOGY_FILE: &str = "docker-compose.test.yml";
pub const ALIAS_FILE: &str = "apps.yml";
pub const ENTRY_POINT_DIR: &str = "bin";
pub const DEFAULT_COMPOSE_COMMAND: &str = "docker-compose";
pub const DEFAULT_DOCKER_SOCKET: &str = "/var/run/docker.sock";
pub const DEFAULT_TRANSFER_IMAGE: &str = "busybox:stable";
pub const DEFAULT_PROJECT: &str = "stevedore";
pub const TEST_SUFFIX: &str = "_test";

/// Environment variable the child receives with the effective project name.
pub const PROJECT_ENV: &str = "COMPOSE_PROJECT_NAME";

// ── User config file schema ──────────────────────────────────────────────────

/// Optional overrides stored in `~/.stevedore/config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub project: Option<String>,
    pub compose_command: Option<String>,
    pub bin_dir: Option<PathBuf>,
    pub docker_socket: Option<PathBuf>,
    pub transfer_image: Option<String>,
}

// ── Resolved settings ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Alternate topology, `_test` project, volumes destroyed on cleanup.
    Test,
}

/// How to invoke the orchestration tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeTarget {
    /// Executable, e.g. `docker-compose` or `docker`.
    pub program: String,
    /// Arguments that precede everything else, e.g. `compose`.
    pub leading_args: Vec<String>,
    /// Topology descriptor handed to `-f`.
    pub config_path: PathBuf,
}

impl ComposeTarget {
    /// `<leading args> -f <config>`.
    #[must_use]
    pub fn base_args(&self) -> Vec<String> {
        let mut args = self.leading_args.clone();
        args.push("-f".to_string());
        args.push(self.config_path.display().to_string());
        args
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding the descriptors and `bin/`; the git checkout.
    pub install_root: PathBuf,
    pub mode: Mode,
    /// Project name before the test-mode suffix.
    pub project: String,
    pub compose: ComposeTarget,
    /// Where `update` links entry points.
    pub bin_dir: PathBuf,
    pub docker_socket: PathBuf,
    pub transfer_image: String,
}

impl Settings {
    /// Resolve settings from defaults, the user config file, and environment.
    ///
    /// Precedence, lowest first: built-in defaults, `user`, then variables
    /// returned by `env`. `force_test` turns on test mode regardless of
    /// `STEVEDORE_TEST`.
    ///
    /// # Errors
    ///
    /// Returns an error if the compose command is blank or `DOCKER_HOST`
    /// names a non-unix transport.
    pub fn resolve(
        install_root: PathBuf,
        home: Option<&Path>,
        user: UserConfig,
        env: impl Fn(&str) -> Option<String>,
        force_test: bool,
    ) -> Result<Self, SettingsError> {
        let mode = if force_test || env("STEVEDORE_TEST").is_some_and(|v| is_truthy(&v)) {
            Mode::Test
        } else {
            Mode::Normal
        };

        let project = env("STEVEDORE_PROJECT")
            .or(user.project)
            .map(|p| sanitize_project(&p))
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| default_project(&install_root));

        let command = env("STEVEDORE_COMPOSE")
            .or(user.compose_command)
            .unwrap_or_else(|| DEFAULT_COMPOSE_COMMAND.to_string());
        let mut words = command.split_whitespace().map(str::to_owned);
        let program = words.next().ok_or(SettingsError::EmptyComposeCommand)?;
        let topology = match mode {
            Mode::Normal => TOPOLOGY_FILE,
            Mode::Test => TEST_TOPOLOGY_FILE,
        };
        let compose = ComposeTarget {
            program,
            leading_args: words.collect(),
            config_path: install_root.join(topology),
        };

        let bin_dir = env("STEVEDORE_BIN_DIR")
            .map(PathBuf::from)
            .or(user.bin_dir)
            .or_else(|| home.map(|h| h.join(".local").join("bin")))
            .unwrap_or_else(|| PathBuf::from("/usr/local/bin"));

        let docker_socket = match env("DOCKER_HOST") {
            Some(host) => match host.strip_prefix("unix://") {
                Some(path) => PathBuf::from(path),
                None => return Err(SettingsError::UnsupportedDockerHost(host)),
            },
            None => user
                .docker_socket
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCKER_SOCKET)),
        };

        let transfer_image = user
            .transfer_image
            .unwrap_or_else(|| DEFAULT_TRANSFER_IMAGE.to_string());

        Ok(Self {
            install_root,
            mode,
            project,
            compose,
            bin_dir,
            docker_socket,
            transfer_image,
        })
    }

    #[must_use]
    pub fn is_test(&self) -> bool {
        self.mode == Mode::Test
    }

    /// Project name as seen by the orchestration tool.
    #[must_use]
    pub fn project_name(&self) -> String {
        match self.mode {
            Mode::Normal => self.project.clone(),
            Mode::Test => format!("{}{TEST_SUFFIX}", self.project),
        }
    }

    #[must_use]
    pub fn topology_file(&self) -> &Path {
        &self.compose.config_path
    }

    #[must_use]
    pub fn alias_file(&self) -> PathBuf {
        self.install_root.join(ALIAS_FILE)
    }

    #[must_use]
    pub fn entry_point_dir(&self) -> PathBuf {
        self.install_root.join(ENTRY_POINT_DIR)
    }

    /// Environment applied to every orchestration-tool child process.
    #[must_use]
    pub fn child_env(&self) -> Vec<(String, String)> {
        vec![(PROJECT_ENV.to_string(), self.project_name())]
    }
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}

/// Compose project names are lowercase alphanumerics, `_` and `-`.
fn sanitize_project(raw: &str) -> String {
    raw.chars()
        .filter_map(|c| {
            let c = c.to_ascii_lowercase();
            (c.is_ascii_alphanumeric() || c == '_' || c == '-').then_some(c)
        })
        .collect()
}

fn default_project(install_root: &Path) -> String {
    install_root
        .file_name()
        .map(|n| sanitize_project(&n.to_string_lossy()))
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| DEFAULT_PROJECT.to_string())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
