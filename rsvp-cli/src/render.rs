//! Everything the terminal shows: event cards, the empty and error
//! states, the logged-out placeholder and the request spinner. The
//! builders return plain strings so the flows in [`crate::app`] stay
//! printable and testable.

use std::time::Duration;

use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use rsvp_core::event::Event;

const DESCRIPTION_PREVIEW_CHARS: usize = 100;

/// One event as a summary card.
pub fn event_card(event: &Event) -> String {
    let when = event
        .start_time
        .with_timezone(&Local)
        .format("%a %b %-d %Y, %H:%M");

    let mut card = format!(
        "{}\n  {} {}\n  {} {}\n  {} {}\n",
        event.title.bold(),
        "Organizer:".dimmed(),
        event.organizer,
        "When:".dimmed(),
        when,
        "Attendees:".dimmed(),
        event.rsvps_count,
    );
    if !event.location.is_empty() {
        card.push_str(&format!("  {} {}\n", "Where:".dimmed(), event.location));
    }
    if !event.description.is_empty() {
        card.push_str(&format!(
            "  {}\n",
            truncate(&event.description, DESCRIPTION_PREVIEW_CHARS)
        ));
    }
    card
}

/// The full list view, or the empty state when there is nothing to show.
pub fn event_list(events: &[Event]) -> String {
    if events.is_empty() {
        return format!("{}\n", "No events found.".dimmed());
    }
    events
        .iter()
        .map(event_card)
        .collect::<Vec<_>>()
        .join("\n")
}

/// What the event area shows when no session exists.
pub fn logged_out_view() -> String {
    format!(
        "{}\n{}\n",
        "Please log in to see events and access features.",
        "Run `rsvp login` to get started.".dimmed()
    )
}

/// Generic failure state for the list view. The cause goes to the debug
/// log, not the screen.
pub fn load_failure() -> String {
    format!(
        "{}\n{}\n",
        "Error loading events.".red(),
        "Re-run with RUST_LOG=debug for details.".dimmed()
    )
}

/// Spinner for transient request states. The caller clears it once the
/// response is in.
pub fn create_spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["-", "\\", "|", "/"])
            .template("{msg} {spinner}")
            .expect("Failed to set spinner template"),
    );
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Cut `text` down to at most `max` characters, on a character boundary,
/// appending an ellipsis only when something was actually cut.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_event() -> Event {
        Event {
            id: 1,
            title: "Team Standup".into(),
            organizer: "casey".into(),
            description: "Weekly sync".into(),
            location: "Room 4".into(),
            start_time: Utc.with_ymd_and_hms(2025, 3, 20, 15, 0, 0).unwrap(),
            end_time: None,
            rsvps_count: 3,
            is_public: true,
        }
    }

    #[test]
    fn card_shows_the_summary_fields() {
        let card = event_card(&sample_event());
        assert!(card.contains("Team Standup"));
        assert!(card.contains("casey"));
        assert!(card.contains("Organizer:"));
        assert!(card.contains("Attendees:"));
        assert!(card.contains("3"));
        assert!(card.contains("Room 4"));
        assert!(card.contains("Weekly sync"));
    }

    #[test]
    fn card_skips_an_empty_location() {
        let mut event = sample_event();
        event.location = String::new();
        let card = event_card(&event);
        assert!(!card.contains("Where:"));
    }

    #[test]
    fn long_descriptions_are_previewed() {
        let mut event = sample_event();
        event.description = "x".repeat(250);
        let card = event_card(&event);
        assert!(card.contains(&format!("{}...", "x".repeat(100))));
        assert!(!card.contains(&"x".repeat(101)));
    }

    #[test]
    fn empty_list_renders_the_empty_state() {
        let view = event_list(&[]);
        assert!(view.contains("No events found."));
    }

    #[test]
    fn logged_out_view_points_at_login() {
        let view = logged_out_view();
        assert!(view.contains("Please log in to see events and access features."));
        assert!(view.contains("rsvp login"));
    }

    #[test]
    fn load_failure_stays_generic() {
        let view = load_failure();
        assert!(view.contains("Error loading events."));
        assert!(view.contains("Re-run with RUST_LOG=debug for details."));
        // Two fixed lines, no room for an error cause.
        assert_eq!(view.lines().count(), 2);
    }

    // --- truncate ---

    #[test]
    fn truncate_leaves_short_text_alone() {
        assert_eq!(truncate("hello", 100), "hello");
        assert_eq!(truncate("hello", 5), "hello");
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        let text = "héllo wörld";
        assert_eq!(truncate(text, 6), "héllo ...");
        assert_eq!(truncate(text, 11), text);
    }
}
