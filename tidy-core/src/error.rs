//! Error types for tidy-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from reading the authoritative manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The record stream is not valid CSV (or could not be read).
    #[error("failed to read manifest records: {0}")]
    Csv(#[from] csv::Error),

    /// No row survived filtering. Usually an upstream format change or a
    /// truncated download.
    #[error("empty list of files")]
    Empty,
}

/// Errors from loading configuration or resolving well-known paths.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure, annotated with the path involved.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load, with file path and serde_yaml line context.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// `dirs::cache_dir()` returned `None`.
    #[error("cannot determine the user cache directory")]
    CacheDirNotFound,
}
