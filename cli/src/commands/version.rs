//! `stevedore version`: installed version and revision.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::update::version_report;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::git::GitUpdateChecker;
use crate::output::json;

/// Arguments for the version command.
#[derive(Args, Debug, Default)]
pub struct VersionArgs {
    /// Also fetch upstream and report pending commits
    #[arg(long)]
    pub check: bool,
}

/// Run `stevedore version [--check]`.
///
/// # Errors
///
/// Returns an error if `--check` is given and the upstream cannot be reached.
pub async fn run(app: &AppContext, args: &VersionArgs) -> Result<ExitCode> {
    let checker = GitUpdateChecker::new(
        TokioCommandRunner::default(),
        app.settings.install_root.clone(),
    );
    let report = version_report(&checker, args.check).await?;
    if app.is_json() {
        println!("{}", json::format_value(&report)?);
    } else {
        app.renderer().render_version(&report);
    }
    Ok(ExitCode::SUCCESS)
}
