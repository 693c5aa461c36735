//! Subcommand implementations.

pub mod companions;
pub mod menu;
pub mod verify;

use std::path::PathBuf;

use anyhow::{bail, Result};
use tidy_core::Manifest;
use tidy_sync::scan::find_collections;

use crate::output;
use crate::prompt::DecisionProvider;

/// Print the manifest size line.
pub(crate) fn announce_manifest(manifest: &Manifest) {
    output::good(format!(
        "List: {} files in {} collections",
        manifest.file_count(),
        manifest.collection_count()
    ));
}

/// Settle on a root directory holding at least one manifest collection.
///
/// A root given on the command line must qualify or the command fails;
/// otherwise the operator is asked until a usable directory is given.
pub(crate) fn resolve_root(
    root: Option<PathBuf>,
    manifest: &Manifest,
    prompt: &mut dyn DecisionProvider,
) -> Result<PathBuf> {
    let total = manifest.collection_count();

    if let Some(root) = root {
        let found = find_collections(&root, manifest.collections()).len();
        if found == 0 {
            bail!("no collection directories were found in '{}'", root.display());
        }
        announce_found(found, total);
        return Ok(root);
    }

    let example = manifest
        .collections()
        .next()
        .map(|c| c.to_string())
        .unwrap_or_default();
    let question = format!(
        "Enter the path to the directory where the downloaded collections (like '{example}') are located:"
    );
    loop {
        let root = prompt.directory(&question, false)?;
        let found = find_collections(&root, manifest.collections()).len();
        if found > 0 {
            announce_found(found, total);
            return Ok(root);
        }
        output::warn(format!(
            "No collection directories were found in '{}'",
            root.display()
        ));
    }
}

fn announce_found(found: usize, total: usize) {
    output::good(format!(
        "Collection directories found locally: {found} of {total}"
    ));
}

/// `".cbz"` → `"cbz"`, for operator-facing wording.
pub(crate) fn kind_label(suffix: &str) -> &str {
    suffix.trim_start_matches('.')
}
