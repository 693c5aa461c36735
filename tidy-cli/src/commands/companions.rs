//! `tidytool companions` — create or update the metadata file paired with
//! every archive, then offer to delete metadata files with no archive.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{bail, Context, Result};
use clap::Args;

use tidy_core::{config, Config};
use tidy_sync::cache::{self, CacheStatus};
use tidy_sync::{delete_orphans, pipeline, sync_companions, ZipSnapshot};

use crate::commands::{announce_manifest, kind_label, resolve_root};
use crate::prompt::DecisionProvider;
use crate::{fetch, output};

/// Arguments for `tidytool companions`.
#[derive(Args, Debug, Default)]
pub struct CompanionsArgs {
    /// Directory holding the collection directories (asked for when omitted).
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Use a local snapshot zip instead of the download cache.
    #[arg(long, value_name = "PATH", hide = true)]
    pub snapshot_file: Option<PathBuf>,
}

impl CompanionsArgs {
    pub fn run(self, config: &Config, prompt: &mut dyn DecisionProvider) -> Result<()> {
        let snapshot_path = match self.snapshot_file {
            Some(path) => path,
            None => {
                let cache_dir = config::cache_dir()?;
                let cached = config::snapshot_path()?;
                prepare_snapshot(config, &cache_dir, cached, prompt)?
            }
        };

        let mut snapshot = ZipSnapshot::open(&snapshot_path, &config.snapshot_prefix)
            .with_context(|| format!("cannot open snapshot '{}'", snapshot_path.display()))?;
        let manifest = snapshot
            .manifest(&config.snapshot_manifest_path, &config.archive_suffix)
            .context("failed to read the list of files from the snapshot")?;
        announce_manifest(&manifest);

        let root = resolve_root(self.root, &manifest, prompt)?;
        let archive_kind = config.archive_kind();
        let companion_kind = config.companion_kind();
        let archive_label = kind_label(archive_kind.suffix());
        let companion_label = kind_label(companion_kind.suffix());

        println!("Listing {archive_label} and {companion_label} files");
        let run = pipeline::plan_companions(&root, &manifest, &archive_kind, &companion_kind)
            .with_context(|| format!("failed to scan '{}'", root.display()))?;
        println!(
            "Found {} {archive_label} and {} {companion_label} file(s)",
            run.archives.total(),
            run.companions.total()
        );

        let question =
            format!("Are you sure you want to create or update paired {companion_label} files?");
        if !prompt.yes_no(&question)? {
            return Ok(());
        }

        let outcome = sync_companions(&root, &run.plan, run.companions, &mut snapshot)
            .context("companion sync aborted")?;

        output::outcomes(&outcome.writes);

        if outcome.orphans.is_empty() {
            println!("No unknown {companion_label} files were found in the collections directories");
            return Ok(());
        }

        let question = if outcome.orphans.len() == 1 {
            format!("There is 1 unknown {companion_label} file in a collection directory. Delete it?")
        } else {
            format!(
                "There are {} unknown {companion_label} files in the collections directories. Delete them?",
                outcome.orphans.len()
            )
        };
        if prompt.yes_no(&question)? {
            output::outcomes(&delete_orphans(&outcome.orphans));
        }
        Ok(())
    }
}

/// Make sure a snapshot is cached, downloading it with the operator's consent.
///
/// Declining the download when nothing is cached is fatal.
fn prepare_snapshot(
    config: &Config,
    cache_dir: &Path,
    path: PathBuf,
    prompt: &mut dyn DecisionProvider,
) -> Result<PathBuf> {
    cache::prepare_cache_dir(cache_dir).context("cannot prepare the cache directory")?;

    let download = match cache::status(&path)? {
        CacheStatus::Missing => {
            let question = format!("Cache file {} not found. Download it now?", path.display());
            if !prompt.yes_no(&question)? {
                bail!("operation cancelled");
            }
            true
        }
        CacheStatus::Present { modified } => {
            let question = format!(
                "Cache file {} already exists. It was downloaded on {} ({} ago). Download it again?",
                path.display(),
                modified.format("%Y-%m-%d %H:%M (%z)"),
                cache::format_age(SystemTime::from(modified)),
            );
            prompt.yes_no(&question)?
        }
    };

    if download {
        output::good(format!("Downloading release from {}", config.snapshot_url));
        let mut body =
            fetch::get(&config.snapshot_url).context("failed to download the snapshot")?;
        cache::store(&path, &mut body).context("failed to store the snapshot")?;
        output::good("Done!");
    }
    Ok(path)
}
