//! Remediation executor for extra files.
//!
//! Every action runs over the whole batch. A failure on one file is recorded
//! as [`FileOutcome::Failed`] and the next file is processed.

use std::path::{Path, PathBuf};

use crate::reconcile::ExtraFiles;

/// Outcome of one per-file step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Reported only; nothing on disk changed.
    Listed { path: PathBuf },
    Deleted { path: PathBuf },
    Moved { from: PathBuf, to: PathBuf },
    Written { path: PathBuf },
    Failed { path: PathBuf, error: String },
}

impl FileOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, FileOutcome::Failed { .. })
    }

    pub(crate) fn failed(path: &Path, error: impl ToString) -> Self {
        FileOutcome::Failed {
            path: path.to_path_buf(),
            error: error.to_string(),
        }
    }
}

/// A fully specified remediation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Remediation {
    List,
    Delete,
    /// Move under `dest_root`, keeping the `collection/filename` layout.
    Move { dest_root: PathBuf },
    Nothing,
}

impl Remediation {
    /// Whether this remediation changes anything on disk.
    pub fn is_mutating(&self) -> bool {
        matches!(self, Remediation::Delete | Remediation::Move { .. })
    }
}

/// Apply `remediation` to every extra file.
pub fn execute(remediation: &Remediation, extra: &ExtraFiles) -> Vec<FileOutcome> {
    match remediation {
        Remediation::List => extra
            .values()
            .map(|path| FileOutcome::Listed { path: path.clone() })
            .collect(),
        Remediation::Delete => delete_paths(extra.values()),
        Remediation::Move { dest_root } => move_files(extra, dest_root),
        Remediation::Nothing => Vec::new(),
    }
}

/// Remove each path.
pub fn delete_paths<'a, I>(paths: I) -> Vec<FileOutcome>
where
    I: IntoIterator<Item = &'a PathBuf>,
{
    paths
        .into_iter()
        .map(|path| match std::fs::remove_file(path) {
            Ok(()) => {
                tracing::info!("deleted: {}", path.display());
                FileOutcome::Deleted { path: path.clone() }
            }
            Err(err) => {
                tracing::warn!("delete failed: {}: {err}", path.display());
                FileOutcome::failed(path, err)
            }
        })
        .collect()
}

/// Move each extra file to `dest_root/<collection>/<filename>`.
///
/// Intermediate directories are created as needed; if that fails, only the
/// affected file is skipped.
pub fn move_files(extra: &ExtraFiles, dest_root: &Path) -> Vec<FileOutcome> {
    extra
        .iter()
        .map(|(key, from)| move_one(from, &dest_root.join(key)))
        .collect()
}

fn move_one(from: &Path, to: &Path) -> FileOutcome {
    if let Some(parent) = to.parent() {
        if !parent.is_dir() {
            if let Err(err) = std::fs::create_dir_all(parent) {
                tracing::warn!("cannot create {}: {err}", parent.display());
                return FileOutcome::failed(from, err);
            }
        }
    }

    match std::fs::rename(from, to) {
        Ok(()) => {
            tracing::info!("moved: {} => {}", from.display(), to.display());
            FileOutcome::Moved {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
            }
        }
        Err(err) => {
            tracing::warn!("move failed: {}: {err}", from.display());
            FileOutcome::failed(from, err)
        }
    }
}
