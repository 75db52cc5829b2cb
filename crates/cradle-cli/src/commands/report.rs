//! Report command for period summaries.
//!
//! This module implements `cradle report` with the period options
//! (--week, --month, --from/--to) and output formats (human-readable, JSON).

use std::fmt::Display;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use cradle_core::{
    DiaperStats, EventStore, GrowthDelta, PeriodReport, Window, diaper_stats, format_duration,
    growth_delta, period_report,
};
use cradle_db::Database;
use serde::Serialize;

use super::util::{date_time, parse_datetime, timezone_name};

/// Report period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Week,
    Month,
    Range {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl Period {
    /// Resolves the command-line flags. `--from`/`--to` win, then `--month`.
    pub fn from_flags(
        month: bool,
        from: Option<&str>,
        to: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        match (from, to) {
            (Some(from), Some(to)) => {
                let start = parse_datetime(from, now).context("invalid --from")?;
                let end = parse_datetime(to, now).context("invalid --to")?;
                if end < start {
                    anyhow::bail!("--to must not be before --from");
                }
                Ok(Self::Range { start, end })
            }
            (None, None) if month => Ok(Self::Month),
            (None, None) => Ok(Self::Week),
            _ => anyhow::bail!("--from and --to must be given together"),
        }
    }

    pub const fn window(self) -> Window {
        match self {
            Self::Week => Window::LastDays(7),
            Self::Month => Window::LastDays(30),
            Self::Range { start, end } => Window::Range { start, end },
        }
    }

    fn describe<Tz>(self, now: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        match self {
            Self::Week => "last 7 days".to_string(),
            Self::Month => "last 30 days".to_string(),
            Self::Range { start, end } => {
                format!("{} to {}", date_time(start, now), date_time(end, now))
            }
        }
    }
}

/// Report data, also the JSON output shape.
#[derive(Debug, Serialize)]
pub struct ReportData {
    pub generated_at: DateTime<Utc>,
    pub timezone: String,
    pub period: PeriodReport,
    pub diapers: DiaperStats,
    pub growth_change: Option<GrowthDelta>,
}

pub fn generate_report_data<Tz: TimeZone>(
    db: &Database,
    period: Period,
    diaper_cost: f64,
    now: &DateTime<Tz>,
) -> Result<ReportData> {
    let log = db.snapshot()?;
    let now_utc = now.with_timezone(&Utc);
    Ok(ReportData {
        generated_at: now_utc,
        timezone: timezone_name(),
        period: period_report(&log, period.window(), now_utc),
        diapers: diaper_stats(&log.diapers, diaper_cost, now),
        growth_change: growth_delta(&log.growth),
    })
}

/// Formats the human-readable report output.
pub fn format_report<Tz>(data: &ReportData, period: Period, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    use std::fmt::Write;

    let mut output = String::new();
    writeln!(output, "REPORT: {}", period.describe(now)).unwrap();
    writeln!(output).unwrap();

    let report = &data.period;
    if report.is_empty() {
        writeln!(output, "No events recorded in this period.").unwrap();
    } else {
        let f = report.feedings;
        writeln!(
            output,
            "Feedings: {} ({} breast, {} bottle, {} ml)",
            f.total, f.breast, f.bottle, f.bottle_volume_ml
        )
        .unwrap();
        let s = report.sleep;
        writeln!(
            output,
            "Sleep: {} sessions, {} total, {} average",
            s.sessions,
            format_duration(s.total_minutes),
            format_duration(s.average_minutes)
        )
        .unwrap();
        let d = report.diapers;
        writeln!(
            output,
            "Diapers: {} ({} wet, {} dirty, {} both)",
            d.total, d.wet, d.dirty, d.both
        )
        .unwrap();
        if let Some(growth) = &report.latest_growth {
            writeln!(
                output,
                "Growth: {:.2} kg, {:.1} cm ({})",
                growth.weight_kg, growth.height_cm, growth.age_at_measurement
            )
            .unwrap();
        }
    }

    let stats = data.diapers;
    writeln!(output).unwrap();
    writeln!(
        output,
        "Diaper use: {} today, {} in 7 days, {} in 30 days",
        stats.today, stats.last_7_days, stats.last_30_days
    )
    .unwrap();
    writeln!(output, "Estimated monthly cost: {:.2}", stats.monthly_cost).unwrap();
    writeln!(output, "Daily average: {:.1}", stats.daily_average).unwrap();
    if let Some(change) = data.growth_change {
        writeln!(
            output,
            "Growth since previous: {:+.2} kg, {:+.1} cm",
            change.weight_kg, change.height_cm
        )
        .unwrap();
    }
    output
}

/// Runs the report command.
pub fn run<W, Tz>(
    writer: &mut W,
    db: &Database,
    period: Period,
    diaper_cost: f64,
    json: bool,
    now: &DateTime<Tz>,
) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let data = generate_report_data(db, period, diaper_cost, now)?;
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&data)?)?;
    } else {
        write!(writer, "{}", format_report(&data, period, now))?;
    }
    Ok(())
}
