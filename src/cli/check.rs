//! `projgen check`: validate inputs without writing anything.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;

use super::load_config;
use crate::emitter::Generator;

#[derive(Args, Debug)]
pub struct CheckCommand {}

impl CheckCommand {
    pub fn execute(self, config_path: &Path, quiet: bool) -> Result<()> {
        let config = load_config(config_path)?;
        let report = Generator::new(config).check()?;

        if !quiet {
            println!(
                "{} {} units, {} project references",
                "✓".green(),
                report.units,
                report.project_edges
            );
            println!("{} Build order has no cycles", "✓".green());
            println!("{} Templates complete in {}", "✓".green(), report.template_dir.display());
        }
        Ok(())
    }
}
