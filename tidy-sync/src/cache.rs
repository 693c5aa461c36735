//! Snapshot cache bookkeeping.
//!
//! A single downloaded zip lives at a fixed path. Freshness is whatever the
//! operator decides after seeing its modification time; nothing is hashed.

use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};

use crate::error::{io_err, SyncError};

/// State of the cached snapshot file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheStatus {
    Missing,
    Present { modified: DateTime<Local> },
}

/// Make sure `dir` is a directory.
///
/// Creates it when missing. When something that is not a directory occupies
/// the path, it is removed first.
pub fn prepare_cache_dir(dir: &Path) -> Result<(), SyncError> {
    match std::fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => return Ok(()),
        Ok(_) => {
            tracing::info!("removing non-directory at cache path {}", dir.display());
            std::fs::remove_file(dir).map_err(|e| io_err(dir, e))?;
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => return Err(io_err(dir, err)),
    }

    tracing::info!("creating cache directory {}", dir.display());
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))
}

/// Look at the cache file without opening it.
pub fn status(path: &Path) -> Result<CacheStatus, SyncError> {
    let meta = match std::fs::metadata(path) {
        Ok(meta) => meta,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(CacheStatus::Missing),
        Err(err) => return Err(io_err(path, err)),
    };
    let modified = meta.modified().map_err(|e| io_err(path, e))?;
    Ok(CacheStatus::Present {
        modified: DateTime::<Local>::from(modified),
    })
}

/// Stream `reader` into the cache file.
///
/// Writes to `<path>.tmp` and renames over `path`, so an interrupted
/// download never leaves a truncated snapshot behind. Returns bytes written.
pub fn store<R: Read>(path: &Path, reader: &mut R) -> Result<u64, SyncError> {
    let tmp = tmp_path(path);
    let written = {
        let mut file = std::fs::File::create(&tmp).map_err(|e| io_err(&tmp, e))?;
        match std::io::copy(reader, &mut file) {
            Ok(n) => n,
            Err(err) => {
                drop(file);
                let _ = std::fs::remove_file(&tmp);
                return Err(io_err(path, err));
            }
        }
    };

    if let Err(err) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, err));
    }
    tracing::info!("stored {written} bytes at {}", path.display());
    Ok(written)
}

/// Human age of a timestamp: `42s`, `5m`, `3h`, `2d`.
pub fn format_age(timestamp: SystemTime) -> String {
    let age = SystemTime::now()
        .duration_since(timestamp)
        .unwrap_or_default()
        .as_secs();
    if age < 60 {
        return format!("{age}s");
    }
    if age < 60 * 60 {
        return format!("{}m", age / 60);
    }
    if age < 60 * 60 * 24 {
        return format!("{}h", age / (60 * 60));
    }
    format!("{}d", age / (60 * 60 * 24))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
