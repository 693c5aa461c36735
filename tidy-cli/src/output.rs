//! Console rendering helpers shared by the commands.

use colored::Colorize;
use tidy_sync::FileOutcome;

pub fn hr() {
    println!("{}", "-----------------------------------".white());
}

pub fn good(message: impl AsRef<str>) {
    println!("{}", message.as_ref().green());
}

pub fn warn(message: impl AsRef<str>) {
    println!("{}", message.as_ref().yellow());
}

pub fn fail(message: impl AsRef<str>) {
    eprintln!("{}", message.as_ref().red());
}

/// Print one line per outcome.
pub fn outcomes(outcomes: &[FileOutcome]) {
    for outcome in outcomes {
        match outcome {
            FileOutcome::Listed { path } => warn(format!("EXTRA: {}", path.display())),
            FileOutcome::Deleted { path } => good(format!("DELETED: {}", path.display())),
            FileOutcome::Moved { from, to } => {
                good(format!("MOVED: {} => {}", from.display(), to.display()))
            }
            FileOutcome::Written { path } => good(format!("WRITTEN: {}", path.display())),
            FileOutcome::Failed { path, error } => {
                warn(format!("ERROR: {error} (file: {})", path.display()))
            }
        }
    }
}

/// `"1 extra gallery"` / `"3 extra galleries"`
pub fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}
