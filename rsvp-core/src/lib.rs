//! Core types for the rsvp client.
//!
//! This crate provides everything the CLI shares with tests and any future
//! frontends:
//! - `event` — the event data model and the paged list shape
//! - `session` — token storage and the observable session state
//! - `config` — global configuration loading
//! - `error` — the core error type

pub mod config;
pub mod error;
pub mod event;
pub mod session;

// Re-export the common types at crate root for convenience
pub use config::RsvpConfig;
pub use error::{RsvpError, RsvpResult};
pub use event::{Event, EventDraft, EventPage};
pub use session::{
    FileSessionStore, MemorySessionStore, Session, SessionState, SessionStore, SessionTokens,
};
