//! Sleep commands: live start/stop tracking and the sleep report.

use std::fmt::Display;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use cradle_core::{
    ChildProfile, EventStore, FeedingPattern, InsightConfig, Record, SleepBudget, SleepEvent,
    find_pattern, format_duration, sleep_budget,
};
use cradle_db::{Database, PROFILE_KEY, SLEEP_START_KEY};
use serde::Serialize;

use super::util::{clock, new_event_id, parse_at};

/// Marks the baby as asleep. A sleep already in progress keeps its start.
pub fn start<W, Tz>(writer: &mut W, db: &mut Database, at: Option<&str>, now: &DateTime<Tz>) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if let Some(since) = db.get_setting::<DateTime<Utc>>(SLEEP_START_KEY)? {
        tracing::warn!(%since, "sleep already in progress, keeping original start");
        writeln!(writer, "Sleep already in progress since {}", clock(since, now))?;
        return Ok(());
    }

    let started = parse_at(at, now.with_timezone(&Utc))?;
    db.put_setting(SLEEP_START_KEY, &started)?;
    writeln!(writer, "Sleep started at {}", clock(started, now))?;
    Ok(())
}

/// Marks the baby as awake and logs the finished sleep.
pub fn stop<W, Tz>(writer: &mut W, db: &mut Database, at: Option<&str>, now: &DateTime<Tz>) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Some(started) = db.get_setting::<DateTime<Utc>>(SLEEP_START_KEY)? else {
        anyhow::bail!("no sleep in progress; run `cradle sleep start` first");
    };
    let ended = parse_at(at, now.with_timezone(&Utc))?;

    let sleep = SleepEvent::new(new_event_id()?, started, ended)
        .context("sleep must end after it started")?;
    let minutes = sleep.duration_minutes;
    db.append(&Record::Sleep(sleep))?;
    db.remove_setting(SLEEP_START_KEY)?;

    writeln!(
        writer,
        "Logged sleep {}-{} ({})",
        clock(started, now),
        clock(ended, now),
        format_duration(minutes)
    )?;
    Ok(())
}

/// Everything the sleep report shows.
#[derive(Debug, Serialize)]
pub struct SleepReport {
    pub child: String,
    pub age_months: u32,
    pub budget: SleepBudget,
    pub percent_of_max: u32,
    pub pattern: Option<FeedingPattern>,
    pub in_progress_since: Option<DateTime<Utc>>,
}

/// Computes the sleep report at `now`.
pub fn build_report<Tz: TimeZone>(
    db: &Database,
    insights: &InsightConfig,
    now: &DateTime<Tz>,
) -> Result<SleepReport> {
    let log = db.snapshot()?;
    let profile: ChildProfile = db.get_setting(PROFILE_KEY)?.unwrap_or_default();
    let age_months = profile.age_in_months(now);

    let budget = sleep_budget::evaluate(&log.sleeps, age_months, insights, now.with_timezone(&Utc));
    let pattern = find_pattern(&log.sleeps, &log.feedings, insights, now);

    Ok(SleepReport {
        child: profile.display_name().to_string(),
        age_months,
        percent_of_max: budget.percent_of_max(),
        budget,
        pattern,
        in_progress_since: db.get_setting(SLEEP_START_KEY)?,
    })
}

pub fn format_report<Tz>(report: &SleepReport, insights: &InsightConfig, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    use std::fmt::Write;

    let mut output = String::new();
    let budget = &report.budget;
    let range = budget.recommended;

    writeln!(output, "SLEEP REPORT: {}", report.child).unwrap();
    writeln!(output).unwrap();
    writeln!(
        output,
        "Last 24 hours: {} ({}% of {}h)",
        format_duration(budget.total_minutes_last_24h),
        report.percent_of_max,
        range.max_hours
    )
    .unwrap();
    writeln!(
        output,
        "Recommended at {} months: {}-{}h",
        report.age_months, range.min_hours, range.max_hours
    )
    .unwrap();
    if budget.below_recommended {
        writeln!(output, "Below the recommended range.").unwrap();
    } else {
        writeln!(output, "Within the recommended range.").unwrap();
    }
    if !budget.advice.is_empty() {
        writeln!(output, "Advice: {}", budget.advice).unwrap();
    }

    writeln!(output).unwrap();
    match report.pattern {
        Some(pattern) => writeln!(
            output,
            "Pattern: feedings around {:02}:00 often come before long sleeps ({} times in {} days)",
            pattern.hour, pattern.occurrences, insights.pattern_window_days
        )
        .unwrap(),
        None => writeln!(output, "Pattern: not enough data yet").unwrap(),
    }

    if let Some(since) = report.in_progress_since {
        writeln!(output, "Sleeping since {}", clock(since, now)).unwrap();
    }
    output
}

pub fn report<W, Tz>(
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
    let report = build_report(db, insights, now)?;
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write!(writer, "{}", format_report(&report, insights, now))?;
    }
    Ok(())
}
