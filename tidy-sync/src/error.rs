//! Error types for tidy-sync.

use std::path::PathBuf;

use thiserror::Error;

use tidy_core::ManifestError;

/// Fatal errors from scanning, pairing, and cache preparation.
///
/// Per-file failures during remediation are not errors; they are reported
/// as [`crate::FileOutcome::Failed`] and the batch carries on.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot archive could not be opened or read.
    #[error("snapshot error at {path}: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// The snapshot has no entry for a companion the pairing plan needs.
    /// The snapshot is stale or corrupt relative to the local archives.
    #[error("snapshot has no entry '{entry}'")]
    SnapshotEntryMissing { entry: String },

    /// The manifest bundled inside the snapshot is unusable.
    #[error("snapshot manifest: {0}")]
    Manifest(#[from] ManifestError),
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
