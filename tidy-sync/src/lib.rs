//! # tidy-sync
//!
//! Filesystem side of gallery reconciliation: scanning collections,
//! diffing against the manifest, remediating extras, syncing companion
//! files from a snapshot, and keeping the snapshot cache.
//!
//! [`pipeline::verify`] and [`pipeline::plan_companions`] are the usual
//! entrypoints.

pub mod cache;
pub mod error;
pub mod pairing;
pub mod pipeline;
pub mod reconcile;
pub mod remediate;
pub mod scan;

pub use error::SyncError;
pub use pairing::{
    delete_orphans, plan_pairs, sync_companions, MemorySnapshot, PairTarget, PairingOutcome,
    SnapshotSource, ZipSnapshot,
};
pub use reconcile::{reconcile, CollectionReport, ExtraFiles, Reconciliation};
pub use remediate::{execute, FileOutcome, Remediation};
