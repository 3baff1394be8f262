use super::commands::{ConfigCommands, ShowCommands, TuiCommands};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "clinic-dashboard")]
#[command(about = "Clinic roster, on-call and notification dashboard")]
pub struct Cli {
    /// Override the API endpoint for this run
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a page once and print it
    Show(ShowCommands),
    /// Launch the interactive dashboard
    Tui(TuiCommands),
    /// Inspect or change configuration
    Config(ConfigCommands),
}
