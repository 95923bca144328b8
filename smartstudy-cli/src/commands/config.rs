//! Config command - show and change settings.json values

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use serde_json::{Map, Value};
use smartstudy_core::config::Config;

use super::get_data_dir;
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the current settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change a setting and save it to settings.json
    Set {
        /// Setting name (e.g. keyPrefix)
        key: String,
        /// New value
        value: String,
    },
}

pub fn run(command: ConfigCommands) -> Result<()> {
    let data_dir = get_data_dir()?;
    let mut config = Config::load(&data_dir)?;

    match command {
        ConfigCommands::Show { json } => {
            if json {
                let map: Map<String, Value> = config
                    .entries()
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), Value::String(v)))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&map)?);
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["Setting", "Value"]);
            for (key, value) in config.entries() {
                table.add_row(vec![key.to_string(), value]);
            }
            println!("{}", table);
            println!(
                "{}",
                data_dir.join("settings.json").display().to_string().dimmed()
            );
            Ok(())
        }
        ConfigCommands::Set { key, value } => {
            config.set(&key, &value)?;
            std::fs::create_dir_all(&data_dir)?;
            config.save(&data_dir)?;
            output::success(&format!("{} set to {}", key, value));
            Ok(())
        }
    }
}
