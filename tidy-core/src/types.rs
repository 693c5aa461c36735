//! Domain types for gallery reconciliation.
//!
//! Filenames are bare base names (`"a.cbz"`), never paths. Paths are only
//! produced at the edges by joining `root/collection/filename`.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Suffix of the primary payload file tracked per gallery.
pub const ARCHIVE_SUFFIX: &str = ".cbz";

/// Suffix of the metadata file paired with each archive.
pub const COMPANION_SUFFIX: &str = ".yaml";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed name for a collection (one subdirectory under the root).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionName(pub String);

impl CollectionName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `root/<collection>`
    pub fn dir_in(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }

    /// `root/<collection>/<filename>`
    pub fn file_in(&self, root: &Path, filename: &str) -> PathBuf {
        root.join(&self.0).join(filename)
    }

    /// `<collection>/<filename>`, the key that is unique across collections.
    pub fn qualify(&self, filename: &str) -> String {
        format!("{}/{}", self.0, filename)
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for CollectionName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CollectionName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// File kinds
// ---------------------------------------------------------------------------

/// A kind of file identified purely by its filename suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileKind {
    suffix: String,
}

impl FileKind {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    pub fn archive() -> Self {
        Self::new(ARCHIVE_SUFFIX)
    }

    pub fn companion() -> Self {
        Self::new(COMPANION_SUFFIX)
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Same rule as a `*<suffix>` glob within one directory.
    pub fn matches(&self, filename: &str) -> bool {
        filename.ends_with(&self.suffix)
    }

    /// Replace this kind's suffix on `filename` with `other`'s suffix.
    ///
    /// `"a.cbz"` as archive → companion gives `"a.yaml"`. A name without this
    /// kind's suffix just gets `other`'s suffix appended.
    pub fn swap_to(&self, filename: &str, other: &FileKind) -> String {
        let base = filename.strip_suffix(&self.suffix).unwrap_or(filename);
        format!("{base}{}", other.suffix)
    }
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

/// Authoritative `collection → expected filenames` listing.
///
/// Collections iterate in name order; filenames keep the order in which the
/// source rows were encountered. Duplicates are kept but every comparison
/// treats the sequence as a set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Manifest {
    entries: BTreeMap<CollectionName, Vec<String>>,
}

impl Manifest {
    pub(crate) fn push(&mut self, collection: CollectionName, filename: String) {
        self.entries.entry(collection).or_default().push(filename);
    }

    /// Collection names, in name order.
    pub fn collections(&self) -> impl Iterator<Item = &CollectionName> {
        self.entries.keys()
    }

    /// Expected filenames for `collection`; empty for unknown collections.
    pub fn expected(&self, collection: &CollectionName) -> &[String] {
        self.entries
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn collection_count(&self) -> usize {
        self.entries.len()
    }

    pub fn file_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CollectionName, &[String])> {
        self.entries.iter().map(|(c, f)| (c, f.as_slice()))
    }
}

impl FromIterator<(CollectionName, Vec<String>)> for Manifest {
    fn from_iter<I: IntoIterator<Item = (CollectionName, Vec<String>)>>(iter: I) -> Self {
        let mut manifest = Manifest::default();
        for (collection, files) in iter {
            manifest.entries.entry(collection).or_default().extend(files);
        }
        manifest
    }
}

// ---------------------------------------------------------------------------
// FileSet
// ---------------------------------------------------------------------------

/// Files physically present per collection for one [`FileKind`].
///
/// Collections with no matching files are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileSet {
    entries: BTreeMap<CollectionName, Vec<String>>,
}

impl FileSet {
    pub fn insert(&mut self, collection: CollectionName, filename: String) {
        self.entries.entry(collection).or_default().push(filename);
    }

    pub fn files(&self, collection: &CollectionName) -> &[String] {
        self.entries
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Remove the first occurrence of `filename` from `collection`.
    ///
    /// Returns `false` when it was not present.
    pub fn remove(&mut self, collection: &CollectionName, filename: &str) -> bool {
        let Some(files) = self.entries.get_mut(collection) else {
            return false;
        };
        let Some(idx) = files.iter().position(|f| f == filename) else {
            return false;
        };
        files.remove(idx);
        if files.is_empty() {
            self.entries.remove(collection);
        }
        true
    }

    pub fn collections(&self) -> impl Iterator<Item = &CollectionName> {
        self.entries.keys()
    }

    pub fn total(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CollectionName, &[String])> {
        self.entries.iter().map(|(c, f)| (c, f.as_slice()))
    }
}

impl FromIterator<(CollectionName, Vec<String>)> for FileSet {
    fn from_iter<I: IntoIterator<Item = (CollectionName, Vec<String>)>>(iter: I) -> Self {
        let mut set = FileSet::default();
        for (collection, files) in iter {
            for file in files {
                set.insert(collection.clone(), file);
            }
        }
        set
    }
}

// ---------------------------------------------------------------------------
// Remediation choices
// ---------------------------------------------------------------------------

/// What the operator wants done with extra files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemediationAction {
    /// Print the extra files, then ask again.
    List,
    Delete,
    Move,
    Nothing,
}

impl RemediationAction {
    pub fn all() -> &'static [RemediationAction] {
        &[
            RemediationAction::List,
            RemediationAction::Delete,
            RemediationAction::Move,
            RemediationAction::Nothing,
        ]
    }

    pub fn key(self) -> char {
        match self {
            RemediationAction::List => 's',
            RemediationAction::Delete => 'd',
            RemediationAction::Move => 'm',
            RemediationAction::Nothing => 'n',
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RemediationAction::List => "Show me the list of galleries then ask again",
            RemediationAction::Delete => "Permanently delete",
            RemediationAction::Move => "Move to another directory",
            RemediationAction::Nothing => "Nothing",
        }
    }

    pub fn from_key(key: char) -> Option<Self> {
        Self::all().iter().copied().find(|a| a.key() == key)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
