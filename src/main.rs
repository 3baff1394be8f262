use anyhow::Result;
use clap::Parser;
use clinic_dashboard::app::AppContext;
use clinic_dashboard::cli::{Cli, Commands, commands};
use clinic_dashboard::config::Config;
use log::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logger to file (truncate on each run)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("clinic-dashboard.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let cli = Cli::parse();
    info!("Starting clinic-dashboard");

    let mut config = Config::load()?;
    if let Some(endpoint) = cli.endpoint.clone() {
        config.set_endpoint(endpoint)?;
    }

    match cli.command {
        Commands::Show(args) => {
            let ctx = AppContext::from_config(&config)?;
            commands::show_command(args, ctx).await?;
        }
        Commands::Tui(args) => {
            let ctx = AppContext::from_config(&config)?;
            commands::tui_command(args, ctx).await?;
        }
        Commands::Config(args) => {
            commands::config_command(args, config)?;
        }
    }

    Ok(())
}
