//! Reminder command for the feeding reminder setting.

use std::fmt::Display;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use cradle_core::event::latest_feeding;
use cradle_core::{EventStore, ReminderConfig, format_duration};
use cradle_db::{Database, REMINDER_KEY};

use super::util::clock;

/// Applies any requested change and prints the resulting reminder.
///
/// When the reminder is on and a feeding has been logged, the time the next
/// feeding is due is printed as well.
pub fn run<W, Tz>(
    writer: &mut W,
    db: &mut Database,
    enable: bool,
    disable: bool,
    interval: Option<i64>,
    now: &DateTime<Tz>,
) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut reminder: ReminderConfig = db.get_setting(REMINDER_KEY)?.unwrap_or_default();
    let changed = enable || disable || interval.is_some();

    if let Some(minutes) = interval {
        reminder.interval_minutes = minutes;
        reminder.validate().context("invalid reminder interval")?;
    }
    if enable {
        reminder.enabled = true;
    } else if disable {
        reminder.enabled = false;
    }

    if changed {
        db.put_setting(REMINDER_KEY, &reminder)?;
        tracing::debug!(?reminder, "updated feeding reminder");
    }

    let state = if reminder.enabled { "on" } else { "off" };
    writeln!(
        writer,
        "Feeding reminder: {state}, every {}",
        format_duration(reminder.interval_minutes)
    )?;

    let log = db.snapshot()?;
    let due = latest_feeding(&log.feedings).and_then(|f| reminder.due_at(f.timestamp));
    if let Some(due) = due {
        writeln!(writer, "Next feeding due at {}", clock(due, now))?;
    }
    Ok(())
}
