//! Log command for recording care events.

use std::fmt::Display;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use cradle_core::{
    ChildProfile, DiaperEvent, EventStore, Feeding, FeedingEvent, GrowthEvent, Record, SleepEvent,
    format_duration,
};
use cradle_db::{Database, PROFILE_KEY};

use super::util::{date_time, new_event_id, parse_at, parse_datetime};
use crate::{FeedingMethod, LogEvent};

/// Builds the record described by the command-line arguments.
pub fn build_record(event: &LogEvent, profile: &ChildProfile, now: DateTime<Utc>) -> Result<Record> {
    let id = new_event_id()?;
    let record = match event {
        LogEvent::Feeding { method } => {
            let (timestamp, feeding) = match method {
                FeedingMethod::Breast { side, minutes, at } => (
                    parse_at(at.as_deref(), now)?,
                    Feeding::Breast {
                        side: (*side).into(),
                        duration_minutes: *minutes,
                    },
                ),
                FeedingMethod::Bottle { ml, at } => {
                    (parse_at(at.as_deref(), now)?, Feeding::Bottle { volume_ml: *ml })
                }
            };
            Record::Feeding(FeedingEvent {
                id,
                timestamp,
                feeding,
            })
        }
        LogEvent::Sleep { start, end } => {
            let start = parse_datetime(start, now).context("invalid --start")?;
            let end = parse_datetime(end, now).context("invalid --end")?;
            Record::Sleep(SleepEvent::new(id, start, end)?)
        }
        LogEvent::Diaper { kind, at } => Record::Diaper(DiaperEvent {
            id,
            timestamp: parse_at(at.as_deref(), now)?,
            kind: (*kind).into(),
        }),
        LogEvent::Growth { weight, height, at } => {
            if !(weight.is_finite() && *weight > 0.0) {
                anyhow::bail!("weight must be a positive number of kilograms, got {weight}");
            }
            if !(height.is_finite() && *height > 0.0) {
                anyhow::bail!("height must be a positive number of centimetres, got {height}");
            }
            let timestamp = parse_at(at.as_deref(), now)?;
            Record::Growth(GrowthEvent {
                id,
                timestamp,
                weight_kg: *weight,
                height_cm: *height,
                age_at_measurement: profile.age_label(&timestamp),
            })
        }
    };
    Ok(record)
}

/// Short description of a record for confirmations.
pub fn describe(record: &Record) -> String {
    match record {
        Record::Feeding(e) => match e.feeding {
            Feeding::Breast {
                side,
                duration_minutes,
            } => format!("breast feeding ({}), {duration_minutes} min", side.as_str()),
            Feeding::Bottle { volume_ml } => format!("bottle feeding, {volume_ml} ml"),
        },
        Record::Sleep(e) => format!("sleep, {}", format_duration(e.duration_minutes)),
        Record::Diaper(e) => format!("diaper ({})", e.kind.label()),
        Record::Growth(e) => format!("growth, {:.2} kg / {:.1} cm", e.weight_kg, e.height_cm),
    }
}

pub fn run<W, Tz>(writer: &mut W, db: &mut Database, event: &LogEvent, now: &DateTime<Tz>) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let profile: ChildProfile = db.get_setting(PROFILE_KEY)?.unwrap_or_default();
    let record = build_record(event, &profile, now.with_timezone(&Utc))?;

    if db.append(&record)? {
        writeln!(
            writer,
            "Logged {} at {}",
            describe(&record),
            date_time(record.timestamp(), now)
        )?;
    } else {
        writeln!(writer, "Event {} already logged", record.id())?;
    }
    Ok(())
}
