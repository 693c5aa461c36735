//! tidy-core — domain types, manifest parsing, configuration, errors.
//!
//! - [`types`] — newtypes, [`Manifest`], [`FileSet`], file kinds
//! - [`manifest`] — CSV manifest parser
//! - [`config`] — [`Config`] load and well-known paths
//! - [`error`] — [`ManifestError`], [`ConfigError`]

pub mod config;
pub mod error;
pub mod manifest;
pub mod types;

pub use config::Config;
pub use error::{ConfigError, ManifestError};
pub use manifest::parse_manifest;
pub use types::{CollectionName, FileKind, FileSet, Manifest, RemediationAction};
