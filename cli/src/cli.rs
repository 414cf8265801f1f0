//! CLI argument parsing and routing.
//!
//! Only the wrapper's own subcommands go through clap. Every other command
//! line is handed verbatim to the classifier and forwarded to the
//! orchestration tool, so its flags never collide with ours.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;
use crate::domain::{CatalogError, DockerApiError, SettingsError, TransferError, UpdateError};
use crate::output::json;

/// Subcommands handled by the wrapper itself.
pub const BUILTINS: &[&str] = &["version", "update", "ports", "import", "export", "apps", "help"];

const FORWARD_HELP: &str = "\
Any other command is forwarded to the orchestration tool with application
names expanded to their services, for example:

  stevedore up -d search     # start every service of the 'search' application
  stevedore logs -f solr     # follow the logs of one service
  stevedore down -v          # arguments are passed through untouched

Set STEVEDORE_TEST=1 to run against docker-compose.test.yml in the
<project>_test project.

Before a forwarded command, --test, --quiet and --no-color apply to the
wrapper and are not passed on (stevedore --test up web). --json is only
available for the built-in subcommands.";

/// Wrapper flags honoured at the head of a forwarded command line.
const FORWARD_WRAPPER_FLAGS: &[&str] = &["--json", "--test", "-q", "--quiet", "--no-color"];

/// Compose wrapper with application expansion
#[derive(Parser, Debug)]
#[command(
    name = "stevedore",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true,
    after_help = FORWARD_HELP
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Use the test topology and project
    #[arg(long, global = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show version and installed revision
    Version(commands::version::VersionArgs),

    /// Update the install from upstream
    Update(commands::update::UpdateArgs),

    /// Show published ports of running services
    Ports,

    /// Restore project volumes from an archive
    Import(commands::transfer::ImportArgs),

    /// Archive project volumes
    Export(commands::transfer::ExportArgs),

    /// List applications and services
    Apps,
}

/// Where a command line is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Parsed by clap and handled by the wrapper.
    Builtin,
    /// Classified and forwarded to the orchestration tool.
    Forward,
}

/// Decide how to dispatch `args` (the command line minus the program name).
///
/// The first non-flag token decides. With no such token, empty input and
/// help/version flags go to clap; anything else is forwarded.
#[must_use]
pub fn route<S: AsRef<str>>(args: &[S]) -> Route {
    match args.iter().map(<S as AsRef<str>>::as_ref).find(|a| !a.starts_with('-')) {
        Some(first) if BUILTINS.contains(&first) => Route::Builtin,
        Some(_) => Route::Forward,
        None if args.is_empty()
            || args
                .iter()
                .any(|a| matches!(a.as_ref(), "-h" | "--help" | "-V" | "--version")) =>
        {
            Route::Builtin
        }
        None => Route::Forward,
    }
}

/// Route and execute one command line.
///
/// # Errors
///
/// Returns an error if the selected command fails outside `--json` mode.
pub async fn run(args: Vec<String>) -> Result<ExitCode> {
    match route(&args) {
        Route::Forward => {
            let (flags, tokens) = take_wrapper_flags(&args)?;
            tracing::debug!(?tokens, "forwarding");
            let app = AppContext::new(&flags)?;
            commands::compose::run(&app, tokens).await
        }
        Route::Builtin => {
            let cli = Cli::parse_from(std::iter::once("stevedore".to_string()).chain(args));
            cli.run().await
        }
    }
}

/// Split the wrapper's own leading flags off a forwarded command line.
///
/// Only the run of wrapper flags at the very start is taken; the same flag
/// after any other token belongs to the orchestration tool.
///
/// # Errors
///
/// Returns an error for `--json`, which forwarded commands cannot honour.
pub fn take_wrapper_flags(args: &[String]) -> Result<(AppFlags, &[String])> {
    let mut flags = AppFlags::from_env();
    let taken = args
        .iter()
        .take_while(|a| FORWARD_WRAPPER_FLAGS.contains(&a.as_str()))
        .count();
    for flag in &args[..taken] {
        match flag.as_str() {
            "--json" => anyhow::bail!(
                "--json is only available for built-in subcommands, not forwarded commands"
            ),
            "--test" => flags.behaviour.test = true,
            "-q" | "--quiet" => flags.output.quiet = true,
            _ => flags.output.no_color = true,
        }
    }
    Ok((flags, &args[taken..]))
}

impl Cli {
    /// Execute the parsed builtin.
    ///
    /// With `--json`, failures are printed as a JSON error object and turned
    /// into a failing exit status instead of being returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails and `--json` is not set.
    pub async fn run(self) -> Result<ExitCode> {
        let json = self.json;
        match self.dispatch().await {
            Ok(code) => Ok(code),
            Err(e) if json => {
                println!("{}", json::format_error(&format!("{e:#}"), error_code(&e))?);
                Ok(ExitCode::FAILURE)
            }
            Err(e) => Err(e),
        }
    }

    async fn dispatch(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            test,
            command,
        } = self;
        let flags = AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags {
                yes: matches!(&command, Command::Update(args) if args.yes),
                test,
            },
        };
        let app = AppContext::new(&flags)?;

        match command {
            Command::Version(args) => commands::version::run(&app, &args).await,
            Command::Update(args) => commands::update::run(&app, &args).await,
            Command::Ports => commands::ports::run(&app).await,
            Command::Import(args) => commands::transfer::import(&app, &args).await,
            Command::Export(args) => commands::transfer::export(&app, &args).await,
            Command::Apps => commands::apps::run(&app),
        }
    }
}

/// Stable machine-readable code for the outermost typed error in `err`.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    for cause in err.chain() {
        if cause.is::<CatalogError>() {
            return "CATALOG";
        }
        if cause.is::<SettingsError>() {
            return "SETTINGS";
        }
        if cause.is::<TransferError>() {
            return "TRANSFER";
        }
        if cause.is::<DockerApiError>() {
            return "DOCKER_API";
        }
        if cause.is::<UpdateError>() {
            return "UPDATE";
        }
    }
    "ERROR"
}
