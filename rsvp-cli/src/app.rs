//! Session-aware flows behind every command: what the startup view shows,
//! how login, logout and create change it, and how the view follows
//! published session transitions instead of being re-checked by hand.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;
use tokio::sync::watch;

use rsvp_core::RsvpConfig;
use rsvp_core::event::EventDraft;
use rsvp_core::session::{FileSessionStore, Session, SessionState};

use crate::client::{ApiClient, ApiError};
use crate::render;

pub struct App {
    client: ApiClient,
    session: Session,
    state_rx: watch::Receiver<SessionState>,
}

impl App {
    /// Wire the app together from the config file and the on-disk session.
    pub fn init() -> Result<App> {
        let config = RsvpConfig::load().context("Failed to load configuration")?;
        let store = FileSessionStore::open_default().context("Failed to open the session store")?;
        let session = Session::new(Arc::new(store));
        let client = ApiClient::new(config.api_base(), session.clone());
        Ok(App::new(client, session))
    }

    pub fn new(client: ApiClient, session: Session) -> App {
        let state_rx = session.subscribe();
        App {
            client,
            session,
            state_rx,
        }
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Startup view: session state alone decides what to show. Logged in
    /// means the event list; logged out means the placeholder, with no
    /// network call at all.
    pub async fn evaluate(&mut self) -> Result<()> {
        let state = *self.state_rx.borrow_and_update();
        match state {
            SessionState::LoggedIn => self.load_events().await,
            SessionState::LoggedOut => {
                print!("{}", render::logged_out_view());
                Ok(())
            }
        }
    }

    /// Fetch and render the event list. Failures render the generic error
    /// state; the cause goes to the debug log. A rejected token clears the
    /// session instead, since the stored credentials are no longer worth
    /// keeping.
    pub async fn load_events(&mut self) -> Result<()> {
        let spinner = render::create_spinner("Loading events...");
        let outcome = self.client.list_events().await;
        spinner.finish_and_clear();

        match outcome {
            Ok(page) => {
                print!("{}", render::event_list(&page.results));
                Ok(())
            }
            Err(err) => {
                log::debug!("failed to load events: {err}");
                if matches!(err, ApiError::Auth { .. }) && self.state() == SessionState::LoggedIn {
                    self.expire_stale_session()?;
                } else {
                    print!("{}", render::load_failure());
                }
                Ok(())
            }
        }
    }

    /// Exchange credentials for a session, then show the logged-in view.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let spinner = render::create_spinner("Logging in...");
        let outcome = self.client.authenticate(username, password).await;
        spinner.finish_and_clear();

        match outcome {
            Ok(_) => {
                println!("{} Logged in as {}.", "✓".green(), username.bold());
                self.sync_view();
                self.load_events().await
            }
            Err(err) => {
                log::debug!("login failed: {err}");
                match err {
                    ApiError::Auth { .. } => bail!("Login failed: invalid username or password."),
                    other => bail!("Login failed: {other}"),
                }
            }
        }
    }

    /// Drop the session. Safe to call when already logged out.
    pub fn logout(&mut self) -> Result<()> {
        self.client
            .clear_session()
            .context("Failed to clear the session")?;
        println!("{}", "Logged out.".green());
        self.sync_view();
        Ok(())
    }

    /// Create an event and, on success, reload the list so it shows up.
    pub async fn create_event(&mut self, draft: &EventDraft) -> Result<()> {
        let spinner = render::create_spinner("Creating event...");
        let outcome = self.client.create_event(draft).await;
        spinner.finish_and_clear();

        match outcome {
            Ok(event) => {
                println!(
                    "{} Event \"{}\" created successfully!",
                    "✓".green(),
                    event.title.bold()
                );
                self.load_events().await
            }
            Err(err) => {
                log::debug!("event creation failed: {err}");
                match err {
                    ApiError::Auth { .. } => {
                        self.expire_stale_session()?;
                        bail!("You need to log in to create events. Run `rsvp login` first.")
                    }
                    ApiError::Validation { detail } => {
                        bail!("The server rejected the event: {detail}")
                    }
                    _ => bail!("Failed to create event."),
                }
            }
        }
    }

    /// The view follows published session transitions: when the state
    /// changed since the last render, redraw the session region.
    fn sync_view(&mut self) {
        if self.state_rx.has_changed().unwrap_or(false) {
            let state = *self.state_rx.borrow_and_update();
            if state == SessionState::LoggedOut {
                print!("{}", render::logged_out_view());
            }
        }
    }

    /// A rejected token on an authenticated call means the stored session
    /// is stale. Drop it; the published transition redraws the view.
    fn expire_stale_session(&mut self) -> Result<()> {
        if self.state() != SessionState::LoggedIn {
            return Ok(());
        }
        self.session
            .clear()
            .context("Failed to clear the stale session")?;
        println!(
            "{}",
            "Your session has expired. Please log in again.".yellow()
        );
        self.sync_view();
        Ok(())
    }
}
