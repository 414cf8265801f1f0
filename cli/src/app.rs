//! Application context: unified state passed to every command handler.
//!
//! Built once per process after routing: settings are resolved here and never
//! change afterwards.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::Settings;
use crate::infra::config::YamlConfigStore;
use crate::infra::install::resolve_install_root;
use crate::output::{HumanRenderer, OutputContext, TerminalReporter};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `STEVEDORE_YES` env vars).
    pub yes: bool,
    /// Force test mode regardless of `STEVEDORE_TEST`.
    pub test: bool,
}

/// Flags passed from the router to `AppContext::new`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
}

impl AppFlags {
    /// Base flags for a forwarded command before its leading wrapper flags
    /// are applied: only `NO_COLOR` is read here.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            output: OutputFlags {
                no_color: std::env::var_os("NO_COLOR").is_some(),
                ..OutputFlags::default()
            },
            behaviour: BehaviourFlags::default(),
        }
    }
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Resolved runtime settings.
    pub settings: Settings,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `STEVEDORE_YES`
    /// environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from router flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the install root cannot be located, the config
    /// file is unreadable, or the environment holds invalid overrides.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let ci_env = std::env::var_os("CI").is_some() || std::env::var_os("STEVEDORE_YES").is_some();
        let non_interactive = flags.behaviour.yes || ci_env;

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            mode,
            settings: load_settings(flags.behaviour.test)?,
            non_interactive,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Human renderer over this context's output.
    #[must_use]
    pub fn renderer(&self) -> HumanRenderer<'_> {
        HumanRenderer::new(&self.output)
    }

    /// Progress reporter handed to application services.
    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `STEVEDORE_YES` env),
    /// returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}

/// Resolve settings from the install root, config file and environment.
///
/// # Errors
///
/// Returns an error if any layer cannot be read or holds an invalid value.
pub fn load_settings(force_test: bool) -> Result<Settings> {
    let env = |key: &str| std::env::var(key).ok();
    let install_root = resolve_install_root(env)?;
    let user = YamlConfigStore.load()?;
    let home = dirs::home_dir();
    let settings = Settings::resolve(install_root, home.as_deref(), user, env, force_test)?;
    tracing::debug!(
        root = %settings.install_root.display(),
        project = %settings.project_name(),
        test = settings.is_test(),
        "settings resolved"
    );
    Ok(settings)
}
