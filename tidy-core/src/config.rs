//! Tool configuration and well-known paths.
//!
//! # Storage layout
//!
//! ```text
//! ~/.tidytool/
//!   config.yaml          (optional; every field has a default)
//! <user cache dir>/TidyTool/
//!   master.zip           (cached metadata snapshot)
//! ```
//!
//! # API pattern
//!
//! Path helpers come in two forms:
//! - `fn_at(base: &Path, …)` — explicit base; used in tests with `TempDir`
//! - `fn(…)` — derives the base from `dirs`, delegates to `_at`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{FileKind, ARCHIVE_SUFFIX, COMPANION_SUFFIX};

pub const DEFAULT_MANIFEST_URL: &str =
    "https://raw.githubusercontent.com/ccdc06/metadata/master/indexes/list.csv";
pub const DEFAULT_SNAPSHOT_URL: &str =
    "https://github.com/ccdc06/metadata/archive/refs/heads/master.zip";

const CONFIG_DIR: &str = ".tidytool";
const CONFIG_FILE: &str = "config.yaml";
const CACHE_DIR: &str = "TidyTool";
const SNAPSHOT_FILE: &str = "master.zip";

/// Runtime configuration. Missing fields fall back to [`Config::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the live manifest CSV is fetched from.
    pub manifest_url: String,
    /// Where the metadata snapshot zip is fetched from.
    pub snapshot_url: String,
    /// Top-level folder inside the snapshot zip.
    pub snapshot_prefix: String,
    /// Manifest CSV location inside the snapshot, relative to the prefix.
    pub snapshot_manifest_path: String,
    pub archive_suffix: String,
    pub companion_suffix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manifest_url: DEFAULT_MANIFEST_URL.to_owned(),
            snapshot_url: DEFAULT_SNAPSHOT_URL.to_owned(),
            snapshot_prefix: "metadata-master".to_owned(),
            snapshot_manifest_path: "indexes/list.csv".to_owned(),
            archive_suffix: ARCHIVE_SUFFIX.to_owned(),
            companion_suffix: COMPANION_SUFFIX.to_owned(),
        }
    }
}

impl Config {
    pub fn archive_kind(&self) -> FileKind {
        FileKind::new(self.archive_suffix.clone())
    }

    pub fn companion_kind(&self) -> FileKind {
        FileKind::new(self.companion_suffix.clone())
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// `<home>/.tidytool/config.yaml` — pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// `<cache_base>/TidyTool` — pure, no I/O.
pub fn cache_dir_at(cache_base: &Path) -> PathBuf {
    cache_base.join(CACHE_DIR)
}

/// `<cache_base>/TidyTool/master.zip` — pure, no I/O.
pub fn snapshot_path_at(cache_base: &Path) -> PathBuf {
    cache_dir_at(cache_base).join(SNAPSHOT_FILE)
}

/// `cache_dir_at` using `dirs::cache_dir()`.
pub fn cache_dir() -> Result<PathBuf, ConfigError> {
    Ok(cache_dir_at(&cache_base()?))
}

/// `snapshot_path_at` using `dirs::cache_dir()`.
pub fn snapshot_path() -> Result<PathBuf, ConfigError> {
    Ok(snapshot_path_at(&cache_base()?))
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Load `<home>/.tidytool/config.yaml`, or defaults when the file is absent.
///
/// Returns `ConfigError::Parse` (with path + line context) if malformed YAML.
pub fn load_at(home: &Path) -> Result<Config, ConfigError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    // An empty file deserializes to `null`, which serde_yaml rejects for a struct.
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse { path, source })
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<Config, ConfigError> {
    load_at(&home()?)
}

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

fn cache_base() -> Result<PathBuf, ConfigError> {
    dirs::cache_dir().ok_or(ConfigError::CacheDirNotFound)
}
