use std::sync::Arc;

use anyhow::Result;
use owo_colors::OwoColorize;

use rsvp_core::RsvpConfig;
use rsvp_core::session::{FileSessionStore, Session, SessionState};

/// Show where rsvp reads its configuration from and what it resolved,
/// writing a commented template on first run.
pub fn run() -> Result<()> {
    let path = RsvpConfig::config_path()?;
    if !path.exists() {
        RsvpConfig::create_default_config(&path)?;
        println!("{}", format!("Created {}", path.display()).green());
    }

    let config = RsvpConfig::load()?;
    let store = FileSessionStore::open_default()?;
    let session_path = store.path().to_path_buf();
    let session = Session::new(Arc::new(store));

    println!("{} {}", "Config file:".dimmed(), path.display());
    println!("{} {}", "Server URL:".dimmed(), config.server_url);
    println!("{} {}", "API base:".dimmed(), config.api_base());
    println!("{} {}", "Session file:".dimmed(), session_path.display());
    match session.state() {
        SessionState::LoggedIn => println!("{} {}", "Session:".dimmed(), "logged in".green()),
        SessionState::LoggedOut => println!("{} {}", "Session:".dimmed(), "logged out"),
    }

    Ok(())
}
