//! Routine command: feeding and sleep rhythms plus today's projected timeline.

use std::fmt::Display;
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use cradle_core::interval::{feeding_rhythm, sleep_rhythm};
use cradle_core::{EventStore, InsightConfig, TimelineEntry, build_today, format_duration};
use cradle_db::Database;
use serde::Serialize;

use super::util::clock;

#[derive(Debug, Serialize)]
pub struct Routine {
    pub feeding_interval_minutes: i64,
    pub sleep_interval_minutes: i64,
    pub window_days: u32,
    pub timeline: Vec<TimelineEntry>,
}

pub fn build_routine<Tz: TimeZone>(
    db: &Database,
    insights: &InsightConfig,
    now: &DateTime<Tz>,
) -> Result<Routine> {
    let log = db.snapshot()?;
    let now_utc = now.with_timezone(&Utc);

    let feeding_interval_minutes = feeding_rhythm(&log.feedings, insights, now_utc);
    let sleep_interval_minutes = sleep_rhythm(&log.sleeps, insights, now_utc);
    let timeline = build_today(
        &log.feedings,
        &log.sleeps,
        &log.diapers,
        feeding_interval_minutes,
        sleep_interval_minutes,
        now,
    );

    Ok(Routine {
        feeding_interval_minutes,
        sleep_interval_minutes,
        window_days: insights.rhythm_window_days,
        timeline,
    })
}

pub fn format_routine<Tz>(routine: &Routine, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    use std::fmt::Write;

    let mut output = String::new();
    writeln!(
        output,
        "Feeding every ~{}, sleep every ~{} (last {} days)",
        format_duration(routine.feeding_interval_minutes),
        format_duration(routine.sleep_interval_minutes),
        routine.window_days
    )
    .unwrap();
    writeln!(output).unwrap();

    if routine.timeline.is_empty() {
        writeln!(output, "Nothing logged today.").unwrap();
        return output;
    }

    writeln!(output, "Today:").unwrap();
    for entry in &routine.timeline {
        writeln!(output, "  {}  {}", clock(entry.at, now), entry.label()).unwrap();
    }
    output
}

pub fn run<W, Tz>(
    writer: &mut W,
    db: &Database,
    insights: &InsightConfig,
    json: bool,
    now: &DateTime<Tz>,
) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let routine = build_routine(db, insights, now)?;
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&routine)?)?;
    } else {
        write!(writer, "{}", format_routine(&routine, now))?;
    }
    Ok(())
}
