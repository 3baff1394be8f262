use crate::app::AppContext;
use anyhow::Result;
use clap::Args;
use std::sync::Arc;

#[derive(Args)]
pub struct TuiCommands {
    /// Route of the page to open
    #[arg(long, default_value = "/")]
    pub route: String,
}

pub async fn tui_command(args: TuiCommands, ctx: AppContext) -> Result<()> {
    crate::tui::launch(Arc::new(ctx), args.route).await
}
