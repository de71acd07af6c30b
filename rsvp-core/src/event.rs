//! Event types for the rsvp client.
//!
//! `Event` is a record as the server returns it, `EventDraft` is the
//! creation payload, and `EventPage` is the paged shape of list responses.
//! The client never persists any of these; they are transient copies held
//! for rendering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An event as returned by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    /// Username of the user who created the event.
    pub organizer: String,
    pub description: String,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Attendee count. Computed server-side and absent on some responses,
    /// so it defaults to zero.
    #[serde(default)]
    pub rsvps_count: u32,
    pub is_public: bool,
}

/// Payload for creating a new event.
///
/// The server assigns identity; there is no local id until the created
/// record comes back.
#[derive(Debug, Clone, Serialize)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_time: DateTime<Utc>,
    /// Open-ended events have no end time. The field is omitted from the
    /// payload entirely, never sent as an empty value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub is_public: bool,
}

/// Paged collection shape of the events endpoint.
///
/// Only `results` is guaranteed; paging metadata may be missing entirely.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPage {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<Event>,
}
