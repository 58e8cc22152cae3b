use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::{config::ConfigLoadOption, context::ContextOverrides};

use super::{args::OutputFormat, SubCommand};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None, disable_help_subcommand = true)]
pub struct Command {
    /// GCP project id (overrides `gcp.project_id`)
    #[arg(long, global = true, display_order = 1000)]
    pub project_id: Option<String>,

    /// GCP region (overrides `gcp.region`)
    #[arg(long, global = true, display_order = 1000)]
    pub region: Option<String>,

    /// Output format
    #[arg(
        short,
        long,
        value_name = "json|yaml",
        default_value = "json",
        global = true,
        display_order = 1000
    )]
    pub output: OutputFormat,

    /// Logging
    #[arg(short = 'l', long, global = true, display_order = 1000)]
    pub logging: bool,

    /// Config file path
    #[arg(long, global = true, display_order = 1000)]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub subcommand: SubCommand,
}

impl Command {
    pub fn init() -> Self {
        Self::parse()
    }

    pub fn context_overrides(&self) -> ContextOverrides {
        ContextOverrides {
            project_id: self.project_id.clone(),
            region: self.region.clone(),
        }
    }

    pub fn config_load_option(&self) -> Result<ConfigLoadOption> {
        let option = if let Some(path) = &self.config_file {
            match path.try_exists() {
                Ok(true) => ConfigLoadOption::Path(path.clone()),
                Ok(false) => {
                    eprintln!("Config file not found: {:?}", path);

                    ConfigLoadOption::Default
                }
                Err(err) => {
                    eprintln!("Failed to check config file exists: {}", err);

                    ConfigLoadOption::Default
                }
            }
        } else {
            let Some(path) = xdg_config_home().map(|dir| dir.join("config.yaml")) else {
                return Ok(ConfigLoadOption::Default);
            };

            match path.try_exists() {
                Ok(true) => ConfigLoadOption::Path(path.clone()),
                Ok(false) => ConfigLoadOption::Default,
                Err(err) => {
                    eprintln!("Failed to check config file exists: {}", err);

                    ConfigLoadOption::Default
                }
            }
        };

        Ok(option)
    }
}

fn xdg_config_home() -> Option<PathBuf> {
    match std::env::var_os("XDG_CONFIG_HOME").map(|s| PathBuf::from(s).join("chaosgcp")) {
        Some(path) => Some(path),
        None => dirs::home_dir().map(|home| home.join(".config").join("chaosgcp")),
    }
}
