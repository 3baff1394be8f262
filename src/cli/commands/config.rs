use crate::config::Config;
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

#[derive(Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Show the effective configuration
    Show,
    /// Persist a new API endpoint
    SetEndpoint {
        /// Endpoint URL
        url: String,
    },
}

pub fn config_command(args: ConfigCommands, config: Config) -> Result<()> {
    match args.command {
        ConfigSubcommands::Show => {
            println!("{} {:?}", "Config file:".bold(), Config::get_config_path()?);
            let rendered = toml::to_string_pretty(&config).context("Failed to serialize config")?;
            println!("{}", rendered);
        }
        ConfigSubcommands::SetEndpoint { url } => {
            // Persist against the stored file, not the env/flag overrides
            let mut stored = Config::load_from(&Config::get_config_path()?)?;
            stored.set_endpoint(url)?;
            stored.save()?;
            println!("{} {}", "Endpoint set to".green(), stored.api.endpoint);
        }
    }
    Ok(())
}
