//! `projgen order`: print the build order.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::Path;

use super::{OutputFormat, load_config};
use crate::core::OutputType;
use crate::graph::{DependencyMap, Sequencer};

#[derive(Args, Debug)]
pub struct OrderCommand {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct OrderEntry<'a> {
    name: &'a str,
    output_type: OutputType,
    output_name: &'a str,
}

impl OrderCommand {
    pub fn execute(self, config_path: &Path) -> Result<()> {
        let config = load_config(config_path)?;
        let map = DependencyMap::load(&config.dependency_map)?;
        let order = Sequencer::new(&map).order()?;

        let entries: Vec<OrderEntry<'_>> = order
            .iter()
            .filter_map(|name| map.get(name))
            .map(|unit| OrderEntry {
                name: &unit.name,
                output_type: unit.output_type.clone(),
                output_name: unit.effective_output_name(),
            })
            .collect();

        match self.format {
            OutputFormat::Text => {
                for entry in &entries {
                    println!("{}", entry.name);
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
        }
        Ok(())
    }
}
