//! Import/export planning: which volumes to mount and what to run.
//!
//! Pure functions only: path existence is checked by the caller.

use std::path::{Path, PathBuf};

use crate::domain::error::TransferError;

/// Mount point of the host directory holding the archive.
pub const TRANSFER_MOUNT: &str = "/transfer";
/// Parent mount point of the project volumes.
pub const VOLUMES_MOUNT: &str = "/volumes";
/// Client used to start the transfer container.
pub const DOCKER_PROGRAM: &str = "docker";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Restore volumes from an archive.
    Import,
    /// Write volumes to an archive.
    Export,
}

/// A `docker run` of the transfer image, fully determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPlan {
    pub direction: Direction,
    /// Absolute host directory mounted at [`TRANSFER_MOUNT`].
    pub host_dir: PathBuf,
    /// Archive file name inside `host_dir`.
    pub archive: String,
    /// `(docker volume, mount point)` pairs.
    pub mounts: Vec<(String, String)>,
    pub image: String,
}

/// Archive name used by `export` when no file is given.
#[must_use]
pub fn default_export_name(project: &str) -> String {
    format!("{project}-export.tar.gz")
}

impl TransferPlan {
    /// Plan a transfer of every volume in `volumes` for `project`.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::NoVolumes`] when `volumes` is empty and
    /// [`TransferError::InvalidArchivePath`] when `archive` is relative or has
    /// no file name.
    pub fn new(
        direction: Direction,
        archive: &Path,
        project: &str,
        volumes: &[String],
        image: &str,
    ) -> Result<Self, TransferError> {
        if volumes.is_empty() {
            return Err(TransferError::NoVolumes);
        }
        let invalid = || TransferError::InvalidArchivePath(archive.to_path_buf());
        if !archive.is_absolute() {
            return Err(invalid());
        }
        let name = archive
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(invalid)?;
        let host_dir = archive.parent().ok_or_else(invalid)?;

        Ok(Self {
            direction,
            host_dir: host_dir.to_path_buf(),
            archive: name.to_string(),
            mounts: volumes
                .iter()
                .map(|v| (format!("{project}_{v}"), format!("{VOLUMES_MOUNT}/{v}")))
                .collect(),
            image: image.to_string(),
        })
    }

    /// Arguments for `docker`.
    #[must_use]
    pub fn docker_args(&self) -> Vec<String> {
        let mut args = vec!["run".to_string(), "--rm".to_string()];
        for (volume, mount) in &self.mounts {
            args.push("-v".to_string());
            args.push(format!("{volume}:{mount}"));
        }
        let read_only = match self.direction {
            Direction::Import => ":ro",
            Direction::Export => "",
        };
        args.push("-v".to_string());
        args.push(format!(
            "{}:{TRANSFER_MOUNT}{read_only}",
            self.host_dir.display()
        ));
        args.push(self.image.clone());

        let mode = match self.direction {
            Direction::Export => "czf",
            Direction::Import => "xzf",
        };
        args.extend([
            "tar".to_string(),
            mode.to_string(),
            format!("{TRANSFER_MOUNT}/{}", self.archive),
            "-C".to_string(),
            VOLUMES_MOUNT.to_string(),
        ]);
        if self.direction == Direction::Export {
            args.push(".".to_string());
        }
        args
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
