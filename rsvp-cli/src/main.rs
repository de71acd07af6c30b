mod app;
mod client;
mod commands;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rsvp")]
#[command(version)]
#[command(about = "Browse and create events on an rsvp server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session
    Login {
        username: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// List upcoming events
    Events,
    /// Create a new event
    New {
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        location: Option<String>,

        /// Start date/time (e.g. "2025-03-20T15:00", local time)
        #[arg(short, long)]
        start: Option<String>,

        /// End date/time (optional)
        #[arg(short, long)]
        end: Option<String>,

        /// List the event publicly
        #[arg(short, long)]
        public: bool,
    },
    /// Show configuration and session paths
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    match cli.command {
        None => commands::status::run().await,
        Some(Commands::Login { username }) => commands::login::run(username).await,
        Some(Commands::Logout) => commands::logout::run(),
        Some(Commands::Events) => commands::events::run().await,
        Some(Commands::New {
            title,
            description,
            location,
            start,
            end,
            public,
        }) => commands::new::run(title, description, location, start, end, public).await,
        Some(Commands::Config) => commands::config::run(),
    }
}
