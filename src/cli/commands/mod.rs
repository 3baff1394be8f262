pub mod config;
pub mod show;
pub mod tui;

pub use config::{ConfigCommands, config_command};
pub use show::{ShowCommands, show_command};
pub use tui::{TuiCommands, tui_command};
