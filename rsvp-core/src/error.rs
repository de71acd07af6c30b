//! Error types for the rsvp client.

use thiserror::Error;

/// Errors that can occur in rsvp-core operations.
#[derive(Error, Debug)]
pub enum RsvpError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for rsvp-core operations.
pub type RsvpResult<T> = Result<T, RsvpError>;
