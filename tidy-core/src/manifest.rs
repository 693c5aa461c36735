//! Manifest parser.
//!
//! The manifest is a two-column CSV: an opaque id, then
//! `<collection>/<filename><suffix>`. Rows that do not fit that shape
//! (headers, blank lines, other file types) are skipped silently.

use std::io::Read;

use crate::error::ManifestError;
use crate::types::{CollectionName, Manifest};

/// Parse a manifest record stream, keeping only rows whose second column
/// names a `suffix` file inside a collection.
///
/// Fails with [`ManifestError::Empty`] when nothing was accepted.
pub fn parse_manifest<R: Read>(reader: R, suffix: &str) -> Result<Manifest, ManifestError> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut manifest = Manifest::default();
    for record in csv.records() {
        let record = record?;
        if let Some((collection, filename)) = accept_row(&record, suffix) {
            manifest.push(CollectionName::from(collection), filename.to_owned());
        }
    }

    if manifest.is_empty() {
        return Err(ManifestError::Empty);
    }
    Ok(manifest)
}

fn accept_row<'r>(record: &'r csv::StringRecord, suffix: &str) -> Option<(&'r str, &'r str)> {
    if record.len() != 2 {
        return None;
    }
    let entry = record.get(1)?;

    // header row
    if !entry.contains('/') {
        return None;
    }
    if !entry.ends_with(suffix) {
        return None;
    }

    let (collection, filename) = entry.split_once('/')?;
    if collection.is_empty() || filename.is_empty() {
        return None;
    }
    Some((collection, filename))
}
