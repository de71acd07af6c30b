use anyhow::{Result, bail};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use dialoguer::{Confirm, Input};
use owo_colors::OwoColorize;

use rsvp_core::event::EventDraft;

use crate::app::App;

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

pub async fn run(
    title: Option<String>,
    description: Option<String>,
    location: Option<String>,
    start: Option<String>,
    end: Option<String>,
    public: bool,
) -> Result<()> {
    let interactive = title.is_none() || start.is_none();

    // --- Title ---
    let title = match title {
        Some(t) => t,
        None => Input::<String>::new()
            .with_prompt("  Title")
            .interact_text()?,
    };

    // --- Start ---
    let start_time = if let Some(s) = start {
        parse_datetime(&s)?
    } else {
        prompt_with_retry("  When? (e.g. 2025-03-20T15:00)", parse_datetime)?
    };

    // --- End ---
    let end_time = match end {
        Some(e) => optional_datetime(&e)?,
        None if interactive => prompt_optional_end()?,
        None => None,
    };

    // --- Description ---
    let description = match description {
        Some(d) => d,
        None if interactive => Input::<String>::new()
            .with_prompt("  Description (skip)")
            .default(String::new())
            .show_default(false)
            .interact_text()?,
        None => String::new(),
    };

    // --- Location ---
    let location = match location {
        Some(l) => l,
        None if interactive => Input::<String>::new()
            .with_prompt("  Where? (skip)")
            .default(String::new())
            .show_default(false)
            .interact_text()?,
        None => String::new(),
    };

    // --- Visibility ---
    let is_public = if public {
        true
    } else if interactive {
        Confirm::new()
            .with_prompt("  List publicly?")
            .default(false)
            .interact()?
    } else {
        false
    };

    let draft = EventDraft {
        title,
        description,
        location,
        start_time,
        end_time,
        is_public,
    };

    if interactive {
        println!();
    }

    let mut app = App::init()?;
    app.create_event(&draft).await
}

/// Prompt the user with retry on parse errors.
fn prompt_with_retry<F>(prompt: &str, parse: F) -> Result<DateTime<Utc>>
where
    F: Fn(&str) -> Result<DateTime<Utc>>,
{
    loop {
        let input: String = Input::new().with_prompt(prompt).interact_text()?;
        match parse(&input) {
            Ok(result) => return Ok(result),
            Err(e) => eprintln!("  {}", e.to_string().red()),
        }
    }
}

/// Prompt for an optional end time; empty input skips it.
fn prompt_optional_end() -> Result<Option<DateTime<Utc>>> {
    loop {
        let input: String = Input::new()
            .with_prompt("  Until? (skip)")
            .default(String::new())
            .show_default(false)
            .interact_text()?;
        match optional_datetime(&input) {
            Ok(result) => return Ok(result),
            Err(e) => eprintln!("  {}", e.to_string().red()),
        }
    }
}

/// Parse a local date/time in one of the accepted formats into UTC.
/// A bare date reads as local midnight.
fn parse_datetime(input: &str) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return to_utc(naive);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return to_utc(date.and_time(NaiveTime::MIN));
    }

    bail!("Could not parse date/time: \"{input}\" (expected e.g. 2025-03-20T15:00)")
}

fn to_utc(naive: NaiveDateTime) -> Result<DateTime<Utc>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| anyhow::anyhow!("That time does not exist in the local timezone"))
}

/// Empty input means no end time; anything else must parse.
fn optional_datetime(input: &str) -> Result<Option<DateTime<Utc>>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    parse_datetime(trimmed).map(Some)
}
