//! Shared pipeline entrypoints used by the CLI commands.

use std::path::Path;

use tidy_core::{CollectionName, FileKind, FileSet, Manifest};

use crate::pairing::{plan_pairs, PairTarget};
use crate::reconcile::{reconcile, Reconciliation};
use crate::scan::{find_collections, scan_files};
use crate::SyncError;

/// Output of [`verify`].
#[derive(Debug, Clone)]
pub struct VerifyRun {
    /// Manifest collections that exist under the root.
    pub collections: Vec<CollectionName>,
    pub found: FileSet,
    pub report: Reconciliation,
}

/// Scan `root` for the manifest's collections and reconcile `kind` files.
///
/// When no collection exists under `root` the run is empty; choosing another
/// root is up to the caller.
pub fn verify(root: &Path, manifest: &Manifest, kind: &FileKind) -> Result<VerifyRun, SyncError> {
    let collections = find_collections(root, manifest.collections());
    let found = scan_files(root, &collections, kind)?;
    let report = reconcile(root, manifest, &found);
    Ok(VerifyRun {
        collections,
        found,
        report,
    })
}

/// Output of [`plan_companions`].
#[derive(Debug, Clone)]
pub struct CompanionRun {
    pub collections: Vec<CollectionName>,
    pub archives: FileSet,
    /// Companion listing taken before anything is written.
    pub companions: FileSet,
    pub plan: Vec<PairTarget>,
}

/// Scan archives and companions under `root` and plan the companion writes.
pub fn plan_companions(
    root: &Path,
    manifest: &Manifest,
    archive_kind: &FileKind,
    companion_kind: &FileKind,
) -> Result<CompanionRun, SyncError> {
    let collections = find_collections(root, manifest.collections());
    let archives = scan_files(root, &collections, archive_kind)?;
    let companions = scan_files(root, &collections, companion_kind)?;
    let plan = plan_pairs(root, &archives, archive_kind, companion_kind);
    Ok(CompanionRun {
        collections,
        archives,
        companions,
        plan,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn verify_without_collections_is_empty() {
        let root = TempDir::new().expect("root");
        let manifest: Manifest = [("alpha".into(), vec!["a.cbz".to_string()])]
            .into_iter()
            .collect();
        let run = verify(root.path(), &manifest, &FileKind::archive()).expect("verify");
        assert!(run.collections.is_empty());
        assert!(run.report.is_clean());
    }

    #[test]
    fn plan_companions_lists_both_kinds() {
        let root = TempDir::new().expect("root");
        let alpha = root.path().join("alpha");
        fs::create_dir(&alpha).expect("mkdir");
        fs::write(alpha.join("a.cbz"), b"").expect("write");
        fs::write(alpha.join("old.yaml"), b"").expect("write");
        let manifest: Manifest = [("alpha".into(), vec!["a.cbz".to_string()])]
            .into_iter()
            .collect();

        let run = plan_companions(
            root.path(),
            &manifest,
            &FileKind::archive(),
            &FileKind::companion(),
        )
        .expect("plan");
        assert_eq!(run.archives.total(), 1);
        assert_eq!(run.companions.files(&"alpha".into()), ["old.yaml"]);
        assert_eq!(run.plan[0].companion, "a.yaml");
    }
}
