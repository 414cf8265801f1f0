//! `stevedore update`: pull the install's checkout and re-link entry points.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::application::ports::{UpdateChecker, UpdateInfo};
use crate::application::services::update;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::git::GitUpdateChecker;
use crate::infra::install::SymlinkLinker;
use crate::output::{json, progress};

/// Arguments for the update command.
#[derive(Args, Debug, Default)]
pub struct UpdateArgs {
    /// Check for updates without applying them
    #[arg(long)]
    pub check: bool,

    /// Apply without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Serialize)]
struct UpdateOutcome<'a> {
    #[serde(flatten)]
    info: &'a UpdateInfo,
    applied: bool,
    links: Vec<String>,
}

/// Run `stevedore update [--check] [--yes]`.
///
/// # Errors
///
/// Returns an error if the install is not a git checkout, the fetch or pull
/// fails, the prompt fails, or an entry point cannot be linked.
pub async fn run(app: &AppContext, args: &UpdateArgs) -> Result<ExitCode> {
    let ctx = &app.output;
    let checker = GitUpdateChecker::new(
        TokioCommandRunner::default(),
        app.settings.install_root.clone(),
    );

    let spinner = (ctx.show_progress() && !app.is_json())
        .then(|| progress::spinner("Checking for updates..."));
    let checked = checker.check().await;
    if let Some(pb) = &spinner {
        match &checked {
            Ok(_) => progress::finish_ok(pb, "Checked upstream"),
            Err(_) => progress::finish_error(pb, "Could not check upstream"),
        }
    }
    let info = checked?;

    let mut applied = false;
    let mut links = Vec::new();
    match &info {
        UpdateInfo::UpToDate => {
            if !app.is_json() {
                ctx.success("Already up to date");
            }
        }
        UpdateInfo::Available { behind, notes } => {
            if !app.is_json() {
                app.renderer().render_pending(*behind, notes);
            }
            if args.check {
                if !app.is_json() {
                    ctx.info("Run: stevedore update");
                }
            } else if app.confirm("Update now?", true)? {
                links = update::apply(&checker, &SymlinkLinker, &app.reporter(), &app.settings)
                    .await?;
                applied = true;
                if !app.is_json() {
                    for link in &links {
                        ctx.kv("linked", &link.display().to_string());
                    }
                }
            } else if !app.is_json() {
                ctx.info("Update cancelled");
            }
        }
    }

    if app.is_json() {
        let outcome = UpdateOutcome {
            info: &info,
            applied,
            links: links.iter().map(|l| l.display().to_string()).collect(),
        };
        println!("{}", json::format_value(&outcome)?);
    }
    Ok(ExitCode::SUCCESS)
}
