//! `tidytool verify` — compare local galleries against the official list.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use tidy_core::{parse_manifest, Config, FileKind, Manifest, RemediationAction};
use tidy_sync::scan::find_collections;
use tidy_sync::{execute, pipeline, Reconciliation, Remediation};

use crate::commands::{announce_manifest, kind_label, resolve_root};
use crate::prompt::DecisionProvider;
use crate::{fetch, output};

/// Arguments for `tidytool verify`.
#[derive(Args, Debug, Default)]
pub struct VerifyArgs {
    /// Directory holding the collection directories (asked for when omitted).
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Print the reconciliation as JSON and exit without remediation.
    #[arg(long, requires = "root")]
    pub json: bool,

    /// Download the list without asking first.
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Read the list from a local CSV file instead of downloading it.
    #[arg(long, value_name = "PATH", hide = true)]
    pub manifest_file: Option<PathBuf>,
}

#[derive(Serialize)]
struct VerifyJson<'a> {
    root: &'a Path,
    collections_found: usize,
    collections_expected: usize,
    report: &'a Reconciliation,
}

#[derive(Tabled)]
struct MissingRow {
    #[tabled(rename = "collection")]
    collection: String,
    #[tabled(rename = "galleries")]
    galleries: String,
    #[tabled(rename = "missing")]
    missing: usize,
}

impl VerifyArgs {
    pub fn run(self, config: &Config, prompt: &mut dyn DecisionProvider) -> Result<()> {
        let Some(manifest) = self.load_manifest(config, prompt)? else {
            output::warn("Download cancelled");
            return Ok(());
        };
        let kind = config.archive_kind();

        if self.json {
            // clap guarantees `--root` alongside `--json`
            let root = self.root.context("--json needs --root")?;
            return print_json(&root, &manifest, &kind);
        }

        announce_manifest(&manifest);
        output::hr();

        let root = resolve_root(self.root, &manifest, prompt)?;
        let run = pipeline::verify(&root, &manifest, &kind)
            .with_context(|| format!("failed to scan '{}'", root.display()))?;

        output::hr();
        report_missing(&run.report, prompt)?;
        output::hr();
        remediate_extra(&run.report, kind_label(kind.suffix()), prompt)?;

        if run.report.is_clean() {
            output::good("Your collections are up to date!");
        }
        Ok(())
    }

    fn load_manifest(
        &self,
        config: &Config,
        prompt: &mut dyn DecisionProvider,
    ) -> Result<Option<Manifest>> {
        if let Some(path) = &self.manifest_file {
            let file = File::open(path)
                .with_context(|| format!("cannot open list file '{}'", path.display()))?;
            let manifest = parse_manifest(BufReader::new(file), &config.archive_suffix)
                .with_context(|| format!("failed to read list file '{}'", path.display()))?;
            return Ok(Some(manifest));
        }

        let question = format!(
            "Download the lists of files and collections from {}?",
            config.manifest_url
        );
        let unattended = self.yes || self.json;
        if !unattended && !prompt.yes_no(&question)? {
            return Ok(None);
        }

        if !self.json {
            output::good("Downloading list of files");
        }
        let body =
            fetch::get(&config.manifest_url).context("failed to download the list of files")?;
        let manifest = parse_manifest(body, &config.archive_suffix)
            .context("failed to read the downloaded list of files")?;
        if !self.json {
            output::good("Download complete");
        }
        Ok(Some(manifest))
    }
}

fn print_json(root: &Path, manifest: &Manifest, kind: &FileKind) -> Result<()> {
    let found = find_collections(root, manifest.collections()).len();
    if found == 0 {
        bail!("no collection directories were found in '{}'", root.display());
    }
    let run = pipeline::verify(root, manifest, kind)
        .with_context(|| format!("failed to scan '{}'", root.display()))?;
    let payload = VerifyJson {
        root,
        collections_found: run.collections.len(),
        collections_expected: manifest.collection_count(),
        report: &run.report,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize verify JSON")?
    );
    Ok(())
}

fn report_missing(report: &Reconciliation, prompt: &mut dyn DecisionProvider) -> Result<()> {
    let rows: Vec<MissingRow> = report
        .incomplete()
        .map(|(collection, r)| MissingRow {
            collection: collection.to_string(),
            galleries: format!("{} of {}", r.present, r.expected),
            missing: r.missing.len(),
        })
        .collect();

    if rows.is_empty() {
        output::good("No missing files found");
        return Ok(());
    }

    output::warn("There are missing files in the following collections:");
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    output::hr();

    if prompt.yes_no("Would you like to see the list of missing files?")? {
        output::hr();
        for path in &report.missing {
            output::warn(format!("MISSING: {}", path.display()));
        }
    }
    Ok(())
}

fn remediate_extra(
    report: &Reconciliation,
    label: &str,
    prompt: &mut dyn DecisionProvider,
) -> Result<()> {
    if report.extra.is_empty() {
        output::good("No extra files found");
        output::hr();
        return Ok(());
    }

    output::warn("There are extra galleries in the following collections:");
    for (collection, r) in report.with_extras() {
        output::warn(format!(
            "{collection} ({})",
            output::plural(r.extra.len(), "extra gallery", "extra galleries")
        ));
    }

    let options: Vec<(char, &str)> = RemediationAction::all()
        .iter()
        .map(|a| (a.key(), a.description()))
        .collect();
    let question = format!(
        "What would you like to do with the extra {} {label} file(s) found?",
        report.total_extra()
    );

    loop {
        output::hr();
        let key = prompt.choose(&question, &options)?;
        let remediation = match RemediationAction::from_key(key) {
            Some(RemediationAction::List) => Remediation::List,
            Some(RemediationAction::Delete) => {
                if !prompt.yes_no("This action can't be undone. Are you sure?")? {
                    continue;
                }
                Remediation::Delete
            }
            Some(RemediationAction::Move) => Remediation::Move {
                dest_root: prompt
                    .directory("Enter the directory where you want to move the files:", true)?,
            },
            Some(RemediationAction::Nothing) | None => Remediation::Nothing,
        };

        output::hr();
        output::outcomes(&execute(&remediation, &report.extra));
        if remediation.is_mutating() || remediation == Remediation::Nothing {
            break;
        }
    }
    output::hr();
    Ok(())
}
