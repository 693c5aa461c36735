//! Local collection scanner.
//!
//! Two steps: find which expected collections exist as directories under the
//! root, then list the files of one kind directly inside each of them.

use std::io::ErrorKind;
use std::path::Path;

use tidy_core::{CollectionName, FileKind, FileSet};

use crate::error::{io_err, SyncError};

/// Return the `candidates` that exist as directories under `root`, in the
/// order they were supplied.
///
/// An empty result is the caller's problem to report; it is not an error here.
pub fn find_collections<'a, I>(root: &Path, candidates: I) -> Vec<CollectionName>
where
    I: IntoIterator<Item = &'a CollectionName>,
{
    candidates
        .into_iter()
        .filter(|c| c.dir_in(root).is_dir())
        .cloned()
        .collect()
}

/// List `kind` files directly inside each collection directory.
///
/// Subdirectories are never descended into, and only regular files (or
/// symlinks to them) count. Names are sorted per collection. A collection
/// with no matches has no entry in the returned set.
pub fn scan_files(
    root: &Path,
    collections: &[CollectionName],
    kind: &FileKind,
) -> Result<FileSet, SyncError> {
    let mut found = FileSet::default();
    for collection in collections {
        let dir = collection.dir_in(root);
        let mut names = list_dir(&dir, kind)?;
        names.sort();
        tracing::debug!(
            "{}: {} '*{}' file(s)",
            dir.display(),
            names.len(),
            kind.suffix()
        );
        for name in names {
            found.insert(collection.clone(), name);
        }
    }
    Ok(found)
}

fn list_dir(dir: &Path, kind: &FileKind) -> Result<Vec<String>, SyncError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        // Removed between the existence check and the listing.
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(io_err(dir, err)),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            tracing::warn!("skipping non UTF-8 file name in {}", dir.display());
            continue;
        };
        if !kind.matches(&name) {
            continue;
        }
        if !entry.path().is_file() {
            continue;
        }
        names.push(name);
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn names(list: &[&str]) -> Vec<CollectionName> {
        list.iter().map(|n| CollectionName::from(*n)).collect()
    }

    #[test]
    fn find_keeps_caller_order_and_skips_files() {
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join("zeta")).unwrap();
        fs::create_dir(root.path().join("alpha")).unwrap();
        fs::write(root.path().join("plain"), b"").unwrap();

        let candidates = names(&["zeta", "missing", "plain", "alpha"]);
        let found = find_collections(root.path(), &candidates);
        assert_eq!(found, names(&["zeta", "alpha"]));
    }

    #[test]
    fn scan_lists_direct_children_only() {
        let root = TempDir::new().unwrap();
        let alpha = root.path().join("alpha");
        fs::create_dir_all(alpha.join("nested.cbz")).unwrap();
        fs::create_dir_all(alpha.join("deeper")).unwrap();
        fs::write(alpha.join("deeper").join("hidden.cbz"), b"").unwrap();
        fs::write(alpha.join("b.cbz"), b"").unwrap();
        fs::write(alpha.join("a.cbz"), b"").unwrap();
        fs::write(alpha.join("a.yaml"), b"").unwrap();

        let set = scan_files(root.path(), &names(&["alpha"]), &FileKind::archive()).unwrap();
        assert_eq!(set.files(&"alpha".into()), ["a.cbz", "b.cbz"]);
        assert_eq!(set.total(), 2);
    }

    #[test]
    fn empty_collection_has_no_entry() {
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join("alpha")).unwrap();
        let set = scan_files(root.path(), &names(&["alpha"]), &FileKind::companion()).unwrap();
        assert!(set.is_empty());
    }
}
