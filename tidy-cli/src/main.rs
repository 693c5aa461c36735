//! tidytool — keep a local gallery collection in line with the official list.
//!
//! # Usage
//!
//! ```text
//! tidytool                              (interactive menu)
//! tidytool verify [--root DIR] [--yes] [--json]
//! tidytool companions [--root DIR]
//! ```
//!
//! Configuration is read from `~/.tidytool/config.yaml` when present.

mod commands;
mod fetch;
mod output;
mod prompt;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use commands::{companions::CompanionsArgs, verify::VerifyArgs};
use prompt::{ConsolePrompter, DecisionProvider};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "tidytool",
    version,
    about = "Reconcile local gallery collections against the official list",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Report missing and extra galleries; delete or move the extras.
    Verify(VerifyArgs),

    /// Create or update the metadata file paired with every gallery.
    Companions(CompanionsArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let stdin = io::stdin();
    let mut prompt = ConsolePrompter::new(stdin.lock(), io::stdout());
    let interactive = cli.command.is_none();

    let ok = match run(cli, &mut prompt) {
        Ok(()) => true,
        Err(err) => {
            output::fail(format!("{err:#}"));
            false
        }
    };

    // Launched from a file manager the console window would close at once.
    if interactive {
        if ok {
            output::good("Execution complete. Press Enter to exit.");
        } else {
            output::warn("Execution complete (with errors). Press Enter to exit.");
        }
        let _ = io::stdout().flush();
        let _ = prompt.read_line();
    }

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run(cli: Cli, prompt: &mut dyn DecisionProvider) -> Result<()> {
    let config = tidy_core::config::load().context("failed to load configuration")?;
    match cli.command {
        Some(Commands::Verify(args)) => args.run(&config, prompt),
        Some(Commands::Companions(args)) => args.run(&config, prompt),
        None => {
            output::good("(Press Ctrl+C to exit at any time)");
            commands::menu::run(&config, prompt)
        }
    }
}

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}
