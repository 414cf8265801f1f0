//! Install-root discovery and entry-point linking.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::EntryPointLinker;

/// Environment variable naming the install root explicitly.
pub const HOME_ENV: &str = "STEVEDORE_HOME";

/// Resolve the install root once at startup.
///
/// `STEVEDORE_HOME` wins. Otherwise the running executable is canonicalised
/// (following the symlink `update` placed in the bin directory) and the root
/// is the parent of its `bin/` directory, or the executable's own directory
/// when it does not live in one.
///
/// Environment lookups go through `env`, the same lookup `Settings::resolve`
/// receives.
///
/// # Errors
///
/// Returns an error if the executable path cannot be determined.
pub fn resolve_install_root(env: impl Fn(&str) -> Option<String>) -> Result<PathBuf> {
    if let Some(home) = env(HOME_ENV).filter(|h| !h.trim().is_empty()) {
        return Ok(PathBuf::from(home));
    }
    let exe = std::env::current_exe().context("cannot locate the running executable")?;
    let exe = exe
        .canonicalize()
        .with_context(|| format!("cannot resolve {}", exe.display()))?;
    Ok(root_for_executable(&exe))
}

/// Install root for an already-canonical executable path.
#[must_use]
pub fn root_for_executable(exe: &Path) -> PathBuf {
    let dir = exe.parent().unwrap_or_else(|| Path::new("/"));
    match (dir.file_name(), dir.parent()) {
        (Some(name), Some(parent)) if name == crate::domain::settings::ENTRY_POINT_DIR => {
            parent.to_path_buf()
        }
        _ => dir.to_path_buf(),
    }
}

/// Links entry points with symlinks.
pub struct SymlinkLinker;

impl EntryPointLinker for SymlinkLinker {
    fn link_all(&self, source: &Path, target: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(target)
            .with_context(|| format!("cannot create {}", target.display()))?;

        let mut entries: Vec<PathBuf> = std::fs::read_dir(source)
            .with_context(|| format!("cannot read {}", source.display()))?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| is_executable(p))
            .collect();
        entries.sort();

        let mut links = Vec::with_capacity(entries.len());
        for entry in entries {
            let Some(name) = entry.file_name() else {
                continue;
            };
            let link = target.join(name);
            if link.symlink_metadata().is_ok() {
                std::fs::remove_file(&link)
                    .with_context(|| format!("cannot replace {}", link.display()))?;
            }
            symlink(&entry, &link)
                .with_context(|| format!("cannot link {} -> {}", link.display(), entry.display()))?;
            tracing::debug!(link = %link.display(), target = %entry.display(), "linked entry point");
            links.push(link);
        }
        Ok(links)
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path).is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(unix)]
fn symlink(original: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(not(unix))]
fn symlink(original: &Path, link: &Path) -> std::io::Result<()> {
    std::fs::copy(original, link).map(|_| ())
}
