//! Pairing synchronizer for companion (metadata) files.
//!
//! Every archive `<name>.cbz` gets a companion `<name>.yaml` copied from the
//! remote snapshot, overwriting what is there. Companions left on disk that
//! no archive claims are orphans.
//!
//! The whole plan is checked against the snapshot before anything is
//! written: a snapshot missing any required entry aborts the run untouched.

use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use zip::result::ZipError;
use zip::ZipArchive;

use tidy_core::{parse_manifest, CollectionName, FileKind, FileSet, Manifest};

use crate::error::{io_err, SyncError};
use crate::remediate::{delete_paths, FileOutcome};

// ---------------------------------------------------------------------------
// Snapshot sources
// ---------------------------------------------------------------------------

/// Read access to companion files inside a metadata snapshot.
pub trait SnapshotSource {
    /// Whether the snapshot has `collection/filename`.
    fn contains(&self, collection: &CollectionName, filename: &str) -> bool;

    /// Bytes of `collection/filename`.
    ///
    /// Fails with [`SyncError::SnapshotEntryMissing`] when absent.
    fn companion(
        &mut self,
        collection: &CollectionName,
        filename: &str,
    ) -> Result<Vec<u8>, SyncError>;
}

/// A snapshot zip on disk, laid out as `<prefix>/<collection>/<filename>`.
pub struct ZipSnapshot {
    path: PathBuf,
    prefix: String,
    names: HashSet<String>,
    archive: ZipArchive<File>,
}

impl ZipSnapshot {
    pub fn open(path: &Path, prefix: &str) -> Result<Self, SyncError> {
        let file = File::open(path).map_err(|e| io_err(path, e))?;
        let archive = ZipArchive::new(file).map_err(|source| SyncError::Snapshot {
            path: path.to_path_buf(),
            source,
        })?;
        let names = archive.file_names().map(str::to_owned).collect();
        Ok(Self {
            path: path.to_path_buf(),
            prefix: prefix.trim_matches('/').to_owned(),
            names,
            archive,
        })
    }

    /// Parse the manifest bundled at `<prefix>/<inner_path>`.
    pub fn manifest(&mut self, inner_path: &str, suffix: &str) -> Result<Manifest, SyncError> {
        let entry = self.entry_name(inner_path);
        let file = self.archive.by_name(&entry).map_err(|err| match err {
            ZipError::FileNotFound => SyncError::SnapshotEntryMissing {
                entry: entry.clone(),
            },
            source => SyncError::Snapshot {
                path: self.path.clone(),
                source,
            },
        })?;
        Ok(parse_manifest(file, suffix)?)
    }

    fn entry_name(&self, inner: &str) -> String {
        if self.prefix.is_empty() {
            inner.to_owned()
        } else {
            format!("{}/{}", self.prefix, inner)
        }
    }
}

impl SnapshotSource for ZipSnapshot {
    fn contains(&self, collection: &CollectionName, filename: &str) -> bool {
        self.names
            .contains(&self.entry_name(&collection.qualify(filename)))
    }

    fn companion(
        &mut self,
        collection: &CollectionName,
        filename: &str,
    ) -> Result<Vec<u8>, SyncError> {
        let entry = self.entry_name(&collection.qualify(filename));
        let mut file = self.archive.by_name(&entry).map_err(|err| match err {
            ZipError::FileNotFound => SyncError::SnapshotEntryMissing {
                entry: entry.clone(),
            },
            source => SyncError::Snapshot {
                path: self.path.clone(),
                source,
            },
        })?;
        let mut buf = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut buf)
            .map_err(|e| io_err(self.path.join(&entry), e))?;
        Ok(buf)
    }
}

/// In-memory snapshot keyed by `collection/filename`.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshot {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemorySnapshot {
    pub fn insert(&mut self, collection: &str, filename: &str, bytes: impl Into<Vec<u8>>) {
        self.entries
            .insert(format!("{collection}/{filename}"), bytes.into());
    }
}

impl SnapshotSource for MemorySnapshot {
    fn contains(&self, collection: &CollectionName, filename: &str) -> bool {
        self.entries.contains_key(&collection.qualify(filename))
    }

    fn companion(
        &mut self,
        collection: &CollectionName,
        filename: &str,
    ) -> Result<Vec<u8>, SyncError> {
        let key = collection.qualify(filename);
        self.entries
            .get(&key)
            .cloned()
            .ok_or(SyncError::SnapshotEntryMissing { entry: key })
    }
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// One archive and the companion it implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairTarget {
    pub collection: CollectionName,
    pub archive: String,
    pub companion: String,
    /// `root/collection/companion`
    pub path: PathBuf,
}

/// Derive the companion for every archive found.
pub fn plan_pairs(
    root: &Path,
    archives: &FileSet,
    archive_kind: &FileKind,
    companion_kind: &FileKind,
) -> Vec<PairTarget> {
    archives
        .iter()
        .flat_map(|(collection, files)| {
            files.iter().map(move |archive| {
                let companion = archive_kind.swap_to(archive, companion_kind);
                PairTarget {
                    collection: collection.clone(),
                    path: collection.file_in(root, &companion),
                    archive: archive.clone(),
                    companion,
                }
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Sync
// ---------------------------------------------------------------------------

/// Result of a companion sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairingOutcome {
    /// One [`FileOutcome::Written`] or [`FileOutcome::Failed`] per planned
    /// companion, in plan order.
    pub writes: Vec<FileOutcome>,
    /// Companions on disk that no successful write consumed.
    pub orphans: Vec<PathBuf>,
}

impl PairingOutcome {
    pub fn written(&self) -> usize {
        self.writes.len() - self.failed()
    }

    pub fn failed(&self) -> usize {
        self.writes.iter().filter(|o| o.is_failure()).count()
    }
}

/// Write every planned companion from `source`, then report orphans.
///
/// `companions` is the companion listing taken before the sync. Each
/// successful write strikes its companion from it; whatever is left over,
/// including companions whose write failed, is reported as orphans. A write
/// failure is recorded and the batch continues.
pub fn sync_companions<S>(
    root: &Path,
    plan: &[PairTarget],
    mut companions: FileSet,
    source: &mut S,
) -> Result<PairingOutcome, SyncError>
where
    S: SnapshotSource + ?Sized,
{
    if let Some(absent) = plan
        .iter()
        .find(|t| !source.contains(&t.collection, &t.companion))
    {
        return Err(SyncError::SnapshotEntryMissing {
            entry: absent.collection.qualify(&absent.companion),
        });
    }

    let mut outcome = PairingOutcome::default();
    for target in plan {
        let bytes = source.companion(&target.collection, &target.companion)?;
        match write_replacing(&target.path, &bytes) {
            Ok(()) => {
                tracing::info!("written: {}", target.path.display());
                companions.remove(&target.collection, &target.companion);
                outcome.writes.push(FileOutcome::Written {
                    path: target.path.clone(),
                });
            }
            Err(err) => {
                tracing::warn!("write failed: {}: {err}", target.path.display());
                outcome.writes.push(FileOutcome::failed(&target.path, err));
            }
        }
    }

    outcome.orphans = companions
        .iter()
        .flat_map(|(collection, files)| files.iter().map(|f| collection.file_in(root, f)))
        .collect();
    Ok(outcome)
}

/// Delete orphaned companions, continuing past individual failures.
pub fn delete_orphans(orphans: &[PathBuf]) -> Vec<FileOutcome> {
    delete_paths(orphans)
}

/// Write via `<path>.tidytool.tmp` and rename over `path`.
fn write_replacing(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tidytool.tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, bytes)?;
    if let Err(err) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_swaps_suffix_per_collection() {
        let archives: FileSet = [
            ("alpha".into(), vec!["a.cbz".to_string()]),
            ("beta".into(), vec!["b.c.cbz".to_string()]),
        ]
        .into_iter()
        .collect();
        let plan = plan_pairs(
            Path::new("/r"),
            &archives,
            &FileKind::archive(),
            &FileKind::companion(),
        );
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].companion, "a.yaml");
        assert_eq!(plan[0].path, PathBuf::from("/r/alpha/a.yaml"));
        assert_eq!(plan[1].companion, "b.c.yaml");
    }

    #[test]
    fn memory_snapshot_missing_entry() {
        let mut snap = MemorySnapshot::default();
        snap.insert("alpha", "a.yaml", "x");
        assert!(snap.contains(&"alpha".into(), "a.yaml"));
        let err = snap.companion(&"alpha".into(), "b.yaml").unwrap_err();
        assert!(matches!(err, SyncError::SnapshotEntryMissing { ref entry } if entry == "alpha/b.yaml"));
    }
}
