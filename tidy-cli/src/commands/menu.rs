//! Interactive entry used when `tidytool` runs without a subcommand.

use anyhow::Result;
use tidy_core::Config;

use crate::commands::{companions::CompanionsArgs, verify::VerifyArgs};
use crate::prompt::DecisionProvider;

const OPTIONS: &[(char, &str)] = &[
    ('v', "Verify the gallery files against the official list"),
    ('c', "Create or update the metadata files paired with each gallery"),
    ('q', "Quit"),
];

pub fn run(config: &Config, prompt: &mut dyn DecisionProvider) -> Result<()> {
    match prompt.choose("What would you like to do?", OPTIONS)? {
        'v' => VerifyArgs::default().run(config, prompt),
        'c' => CompanionsArgs::default().run(config, prompt),
        _ => Ok(()),
    }
}
