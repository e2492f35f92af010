//! `projgen generate`: the full generation pass.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};

use super::load_config;
use crate::config::SolutionConfig;
use crate::emitter::Generator;

#[derive(Args, Debug)]
pub struct GenerateCommand {
    /// Target environment; selects the template and output subdirectories
    #[arg(short, long)]
    pub environment: Option<String>,

    /// Output root directory, overriding the configuration
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Additional solution as NAME=PATTERNS (comma-separated patterns)
    #[arg(long = "solution", value_name = "NAME=PATTERNS", value_parser = parse_solution)]
    pub solutions: Vec<SolutionConfig>,
}

fn parse_solution(arg: &str) -> Result<SolutionConfig, String> {
    let (name, include) =
        arg.split_once('=').ok_or_else(|| format!("expected NAME=PATTERNS, got '{arg}'"))?;
    let (name, include) = (name.trim(), include.trim());
    if name.is_empty() || include.is_empty() {
        return Err(format!("expected NAME=PATTERNS, got '{arg}'"));
    }
    Ok(SolutionConfig {
        name: name.to_string(),
        include: include.to_string(),
        folders: Vec::new(),
    })
}

impl GenerateCommand {
    pub fn execute(self, config_path: &Path, quiet: bool) -> Result<()> {
        let mut config = load_config(config_path)?;
        if let Some(environment) = self.environment {
            config.environment = environment;
        }
        if let Some(output) = self.output {
            config.output_dir = if output.is_relative() {
                std::env::current_dir()
                    .context("Failed to determine the current directory")?
                    .join(output)
            } else {
                output
            };
        }
        config.solutions.extend(self.solutions);

        let output_dir = config.environment_output_dir();
        let report = Generator::new(config).run()?;

        if !quiet {
            println!("{}", "Generation complete!".green().bold());
            println!("  {} projects", report.projects.len());
            println!("  {} solutions", report.solutions.len());
            if report.new_ids > 0 {
                println!("  {} new ids", report.new_ids);
            }
            println!("  output: {}", output_dir.display());
        }
        Ok(())
    }
}
