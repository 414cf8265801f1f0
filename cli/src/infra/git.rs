//! Update infrastructure: implements `UpdateChecker` on top of the install's
//! git checkout.

use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::{CommandRunner, UpdateChecker, UpdateInfo};
use crate::domain::error::UpdateError;

/// Fetch and pull talk to the network; allow them more time.
pub const NETWORK_TIMEOUT: Duration = Duration::from_secs(120);

/// Maximum number of pending commit subjects reported.
pub const MAX_NOTES: usize = 5;

/// Uses `git` in the install root to check and apply updates.
pub struct GitUpdateChecker<R: CommandRunner> {
    runner: R,
    root: PathBuf,
}

impl<R: CommandRunner> GitUpdateChecker<R> {
    #[must_use]
    pub fn new(runner: R, root: PathBuf) -> Self {
        Self { runner, root }
    }

    async fn git(&self, args: &[&str], timeout: Option<Duration>) -> Result<String> {
        let root = self.root.display().to_string();
        let mut full = vec!["-C", root.as_str()];
        full.extend_from_slice(args);
        let output = match timeout {
            Some(t) => self.runner.run_with_timeout("git", &full, t).await?,
            None => self.runner.run("git", &full).await?,
        };
        check_output(args, &output)?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn ensure_checkout(&self) -> Result<()> {
        let inside = self
            .git(&["rev-parse", "--is-inside-work-tree"], None)
            .await
            .map_err(|_| UpdateError::NotACheckout(self.root.clone()))?;
        if inside != "true" {
            return Err(UpdateError::NotACheckout(self.root.clone()).into());
        }
        Ok(())
    }
}

impl<R: CommandRunner> UpdateChecker for GitUpdateChecker<R> {
    async fn current_revision(&self) -> Result<String> {
        self.ensure_checkout().await?;
        self.git(&["rev-parse", "--short", "HEAD"], None).await
    }

    async fn check(&self) -> Result<UpdateInfo> {
        self.ensure_checkout().await?;
        self.git(&["fetch", "--quiet"], Some(NETWORK_TIMEOUT)).await?;

        let count_args = ["rev-list", "--count", "HEAD..@{u}"];
        let count = self.git(&count_args, None).await?;
        let behind = parse_commit_count(&count).ok_or_else(|| UpdateError::UnexpectedOutput {
            command: count_args.join(" "),
            output: count.clone(),
        })?;
        if behind == 0 {
            return Ok(UpdateInfo::UpToDate);
        }

        let max = format!("-n{MAX_NOTES}");
        let log = self
            .git(&["log", "--format=%s", max.as_str(), "HEAD..@{u}"], None)
            .await?;
        Ok(UpdateInfo::Available {
            behind,
            notes: parse_notes(&log),
        })
    }

    async fn pull(&self) -> Result<()> {
        self.ensure_checkout().await?;
        self.git(&["pull", "--ff-only", "--quiet"], Some(NETWORK_TIMEOUT))
            .await?;
        Ok(())
    }
}

fn check_output(args: &[&str], output: &Output) -> Result<(), UpdateError> {
    if output.status.success() {
        return Ok(());
    }
    Err(UpdateError::Git {
        command: args.join(" "),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

/// Parse `git rev-list --count` output.
#[must_use]
pub fn parse_commit_count(raw: &str) -> Option<u32> {
    raw.trim().parse().ok()
}

/// Non-empty commit subjects, at most [`MAX_NOTES`].
#[must_use]
pub fn parse_notes(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(MAX_NOTES)
        .map(str::to_string)
        .collect()
}
