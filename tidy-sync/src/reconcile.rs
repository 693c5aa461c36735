//! Reconciliation engine: expected manifest vs. files found on disk.
//!
//! Pure computation, no I/O. Comparison is on filename identity only.
//!
//! Only collections present in the *found* set are compared. A found
//! collection the manifest does not know has an empty expectation, so all of
//! its files surface as extras.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::Serialize;

use tidy_core::{CollectionName, FileSet, Manifest};

/// Extra files keyed by `collection/filename`, valued by their full path.
pub type ExtraFiles = BTreeMap<String, PathBuf>;

/// Per-collection comparison result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectionReport {
    /// Distinct filenames the manifest lists for the collection.
    pub expected: usize,
    /// How many of those are present.
    pub present: usize,
    /// `expected − found`, in manifest order.
    pub missing: Vec<String>,
    /// `found − expected`, in listing order.
    pub extra: Vec<String>,
}

/// Result of comparing a [`Manifest`] against a [`FileSet`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub collections: BTreeMap<CollectionName, CollectionReport>,
    /// Every missing file resolved to `root/collection/filename`.
    pub missing: Vec<PathBuf>,
    pub extra: ExtraFiles,
}

impl Reconciliation {
    /// Collections with at least one missing file.
    pub fn incomplete(&self) -> impl Iterator<Item = (&CollectionName, &CollectionReport)> {
        self.collections.iter().filter(|(_, r)| !r.missing.is_empty())
    }

    /// Collections with at least one extra file.
    pub fn with_extras(&self) -> impl Iterator<Item = (&CollectionName, &CollectionReport)> {
        self.collections.iter().filter(|(_, r)| !r.extra.is_empty())
    }

    pub fn total_missing(&self) -> usize {
        self.missing.len()
    }

    pub fn total_extra(&self) -> usize {
        self.extra.len()
    }

    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

/// Compare what the manifest expects with what was found under `root`.
pub fn reconcile(root: &Path, expected: &Manifest, found: &FileSet) -> Reconciliation {
    let mut out = Reconciliation::default();

    for (collection, found_files) in found.iter() {
        let expected_files = expected.expected(collection);

        let missing = difference(expected_files, found_files);
        let extra = difference(found_files, expected_files);
        let expected_count = distinct(expected_files);

        for name in &missing {
            out.missing.push(collection.file_in(root, name));
        }
        for name in &extra {
            out.extra
                .insert(collection.qualify(name), collection.file_in(root, name));
        }

        out.collections.insert(
            collection.clone(),
            CollectionReport {
                expected: expected_count,
                present: expected_count - missing.len(),
                missing,
                extra,
            },
        );
    }

    out
}

/// Distinct items of `a` not in `b`, keeping `a`'s order.
fn difference(a: &[String], b: &[String]) -> Vec<String> {
    let b: BTreeSet<&str> = b.iter().map(String::as_str).collect();
    let mut seen = BTreeSet::new();
    a.iter()
        .filter(|item| !b.contains(item.as_str()) && seen.insert(item.as_str()))
        .cloned()
        .collect()
}

fn distinct(a: &[String]) -> usize {
    a.iter().map(String::as_str).collect::<BTreeSet<_>>().len()
}
