mod commands;
mod config;
mod google;

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use taskmaker_core::ItemKind;

#[derive(Parser)]
#[command(name = "taskmaker")]
#[command(about = "Create tasks and events in Google Calendar from your terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authorize access to your Google Calendar account
    Auth,
    /// Create a new task or event (prompts for anything not given as a flag)
    New {
        /// Item kind: task or event
        #[arg(short, long)]
        kind: Option<ItemKind>,

        /// Display name
        #[arg(short, long)]
        name: Option<String>,

        /// Description text
        #[arg(short = 'D', long)]
        description: Option<String>,

        /// Start date (MM-DD-YYYY)
        #[arg(long)]
        date: Option<String>,

        /// Start time (HH:MM AM/PM)
        #[arg(long)]
        start: Option<String>,

        /// End time (HH:MM AM/PM, events only)
        #[arg(long)]
        end: Option<String>,

        /// Span the whole day (00:00:00 to 23:59:59)
        #[arg(long)]
        all_day: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Auth => commands::auth::run().await,
        Commands::New {
            kind,
            name,
            description,
            date,
            start,
            end,
            all_day,
        } => commands::new::run(kind, name, description, date, start, end, all_day).await,
    }
}
