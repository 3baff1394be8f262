use crate::app::AppContext;
use crate::notify::ToastLevel;
use crate::page::Controller;
use crate::render::{BadgeTone, Content, PlaceholderKind, Target, targets};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use is_terminal::IsTerminal;
use std::collections::BTreeMap;

#[derive(Args)]
pub struct ShowCommands {
    /// Route of the page to load
    #[arg(long, default_value = "/")]
    pub route: String,

    /// Print the dashboard snapshot as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub async fn show_command(args: ShowCommands, ctx: AppContext) -> Result<()> {
    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let controller = ctx.bootstrap(&args.route).await;

    if args.json {
        let output = match controller.as_ref() {
            Controller::Dashboard(dashboard) => serde_json::to_string_pretty(&dashboard.snapshot()),
            Controller::Generic(_) => serde_json::to_string_pretty(&controller.page().snapshot()),
        }
        .context("Failed to serialize page")?;
        println!("{}", output);
    } else {
        print_page(&controller.page().snapshot());
    }

    for toast in ctx.notifier().active() {
        let line = format!("{} {}", toast.level.icon(), toast.message);
        match toast.level {
            ToastLevel::Error => eprintln!("{}", line.red()),
            ToastLevel::Success => eprintln!("{}", line.green()),
        }
    }

    Ok(())
}

fn print_page(page: &BTreeMap<String, Target>) {
    if let Some(stamp) = page.get(targets::LAST_UPDATED).and_then(|t| t.content.as_text()) {
        println!("{}", stamp.dimmed());
    }

    let stats = [
        ("Doctors", targets::DOCTOR_COUNT),
        ("Clinics", targets::CLINIC_COUNT),
        ("Today's roster", targets::ROSTER_COUNT),
        ("Pending notifications", targets::NOTIFICATION_COUNT),
    ];
    for (label, id) in stats {
        if let Some(value) = page.get(id).and_then(|t| t.content.as_text()) {
            println!("{:<24}{}", label, value.bold());
        }
    }

    for (title, id) in [("Today's schedule", targets::TODAY_SCHEDULE), ("On call today", targets::ON_CALL_TODAY)] {
        if let Some(target) = page.get(id) {
            println!();
            println!("{}", title.bold().underline());
            print_content(&target.content);
        }
    }
}

fn print_content(content: &Content) {
    match content {
        Content::Items(items) => {
            for item in items {
                let badge = item.badge.as_ref().map(|b| {
                    let label = format!("[{}]", b.label);
                    match b.tone {
                        BadgeTone::Success => label.green(),
                        BadgeTone::Warning => label.yellow(),
                        BadgeTone::Neutral => label.normal(),
                    }
                });
                match badge {
                    Some(badge) => println!("  {} {}", item.title.bold(), badge),
                    None => println!("  {}", item.title.bold()),
                }
                if let Some(subtitle) = &item.subtitle {
                    println!("    {}", subtitle);
                }
                for detail in &item.details {
                    println!("    {}", detail);
                }
            }
        }
        Content::Placeholder { kind: PlaceholderKind::Empty, message } => println!("  {}", message.dimmed()),
        Content::Placeholder { kind: PlaceholderKind::Error, message } => println!("  {}", message.red()),
        Content::Text(text) => println!("  {}", text),
        Content::Blank => {}
    }
}
