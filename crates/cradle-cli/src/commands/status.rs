//! Status command: next suggested action, latest events and today's counts.

use std::fmt::Display;
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use cradle_core::event::latest_feeding;
use cradle_core::{
    AdvisorState, ChildProfile, DailySummary, EventStore, Feeding, InsightConfig, NextAction,
    ReminderConfig, Trigger, format_duration, format_elapsed, next_action, summarize_day,
};
use cradle_db::{Database, PROFILE_KEY, REMINDER_KEY, SLEEP_START_KEY};
use serde::Serialize;

use super::util::clock;

/// Status data, also the JSON output shape.
#[derive(Debug, Serialize)]
pub struct Status {
    pub child: String,
    pub age: String,
    pub next_action: NextAction,
    pub last_feeding_at: Option<DateTime<Utc>>,
    pub last_feeding: Option<Feeding>,
    /// Set when the feeding reminder is on and a feeding has been logged.
    pub next_feeding_due: Option<DateTime<Utc>>,
    pub last_wake_at: Option<DateTime<Utc>>,
    pub last_diaper_at: Option<DateTime<Utc>>,
    pub sleeping_since: Option<DateTime<Utc>>,
    pub today: DailySummary,
}

pub fn build_status<Tz: TimeZone>(
    db: &Database,
    insights: &InsightConfig,
    now: &DateTime<Tz>,
) -> Result<Status> {
    let log = db.snapshot()?;
    let profile: ChildProfile = db.get_setting(PROFILE_KEY)?.unwrap_or_default();
    let reminder: ReminderConfig = db.get_setting(REMINDER_KEY)?.unwrap_or_default();

    let sleeping_since: Option<DateTime<Utc>> = db.get_setting(SLEEP_START_KEY)?;

    let state = AdvisorState {
        asleep_since: sleeping_since,
        ..AdvisorState::from_events(&log.feedings, &log.sleeps, &log.diapers, reminder)
    };
    let action = next_action(&state, insights, now.with_timezone(&Utc));
    tracing::debug!(?action, "computed next action");

    Ok(Status {
        child: profile.display_name().to_string(),
        age: profile.age_label(now),
        next_action: action,
        last_feeding_at: state.last_feeding_at,
        last_feeding: latest_feeding(&log.feedings).map(|f| f.feeding),
        next_feeding_due: state.last_feeding_at.and_then(|t| reminder.due_at(t)),
        last_wake_at: state.last_wake_at,
        last_diaper_at: state.last_diaper_at,
        sleeping_since,
        today: summarize_day(&log.feedings, &log.sleeps, &log.diapers, now),
    })
}

fn trigger_reason(status: &Status, insights: &InsightConfig, reminder_minutes: i64) -> String {
    match status.next_action.trigger {
        Trigger::NoHistory => " (nothing logged yet)".to_string(),
        Trigger::ReminderDue => format!(" (reminder every {})", format_duration(reminder_minutes)),
        Trigger::FeedingCeiling => format!(
            " (over {} since the last feeding)",
            format_duration(insights.feeding_ceiling_minutes)
        ),
        Trigger::AwakeCeiling => format!(
            " (awake over {})",
            format_duration(insights.awake_ceiling_minutes)
        ),
        Trigger::Nothing => String::new(),
    }
}

pub fn format_status<Tz>(
    status: &Status,
    insights: &InsightConfig,
    reminder_minutes: i64,
    now: &DateTime<Tz>,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    use std::fmt::Write;

    let now_utc = now.with_timezone(&Utc);
    let elapsed = |t: Option<DateTime<Utc>>| {
        t.map_or_else(|| "never".to_string(), |t| format_elapsed(t, now_utc))
    };

    let mut output = String::new();
    writeln!(output, "STATUS: {} ({})", status.child, status.age).unwrap();
    writeln!(output).unwrap();
    writeln!(
        output,
        "Next: {}{}",
        status.next_action.action.label(),
        trigger_reason(status, insights, reminder_minutes)
    )
    .unwrap();

    let feeding_kind = status
        .last_feeding
        .map(|f| format!(" ({})", f.label()))
        .unwrap_or_default();
    writeln!(
        output,
        "Last feeding: {}{feeding_kind}",
        elapsed(status.last_feeding_at)
    )
    .unwrap();
    if let Some(due) = status.next_feeding_due {
        writeln!(output, "Next feeding due at {}", clock(due, now)).unwrap();
    }
    writeln!(output, "Last wake-up: {}", elapsed(status.last_wake_at)).unwrap();
    writeln!(output, "Last diaper: {}", elapsed(status.last_diaper_at)).unwrap();
    if let Some(since) = status.sleeping_since {
        writeln!(output, "Sleeping since {}", clock(since, now)).unwrap();
    }

    let today = status.today;
    writeln!(output).unwrap();
    writeln!(
        output,
        "Today: {} feedings, {} sleeps ({}), {} diapers",
        today.feedings,
        today.sleeps,
        format_duration(today.sleep_minutes),
        today.diapers
    )
    .unwrap();
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
    let status = build_status(db, insights, now)?;
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&status)?)?;
    } else {
        let reminder: ReminderConfig = db.get_setting(REMINDER_KEY)?.unwrap_or_default();
        write!(
            writer,
            "{}",
            format_status(&status, insights, reminder.interval_minutes, now)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use cradle_core::{DiaperEvent, DiaperKind, EventId, FeedingEvent, Record, SleepEvent};
    use insta::assert_snapshot;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 14, 0, 0).unwrap()
    }

    fn id(s: &str) -> EventId {
        EventId::new(s).unwrap()
    }

    fn render(db: &Database) -> String {
        let mut output = Vec::new();
        run(&mut output, db, &InsightConfig::default(), false, &now()).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn empty_log_asks_for_first_activity() {
        let db = Database::open_in_memory().unwrap();
        assert_snapshot!(render(&db), @r"
        STATUS: Baby (0 months)

        Next: Log the first activity (nothing logged yet)
        Last feeding: never
        Last wake-up: never
        Last diaper: never

        Today: 0 feedings, 0 sleeps (0h 0m), 0 diapers
        ");
    }

    #[test]
    fn overdue_feeding_is_suggested() {
        let mut db = Database::open_in_memory().unwrap();
        db.append(&Record::Feeding(FeedingEvent {
            id: id("f1"),
            timestamp: now() - Duration::minutes(4 * 60 + 30),
            feeding: Feeding::Bottle { volume_ml: 120 },
        }))
        .unwrap();
        db.append(&Record::Sleep(
            SleepEvent::new(
                id("nap"),
                now() - Duration::hours(3),
                now() - Duration::minutes(65),
            )
            .unwrap(),
        ))
        .unwrap();
        db.append(&Record::Diaper(DiaperEvent {
            id: id("d1"),
            timestamp: now() - Duration::minutes(20),
            kind: DiaperKind::Wet,
        }))
        .unwrap();

        assert_snapshot!(render(&db), @r"
        STATUS: Baby (0 months)

        Next: Time to feed (over 4h 0m since the last feeding)
        Last feeding: 4h 30m ago (Bottle)
        Last wake-up: 1h 5m ago
        Last diaper: 20m ago

        Today: 1 feedings, 1 sleeps (1h 55m), 1 diapers
        ");
    }

    #[test]
    fn reminder_takes_priority() {
        let mut db = Database::open_in_memory().unwrap();
        db.put_setting(
            REMINDER_KEY,
            &ReminderConfig {
                enabled: true,
                interval_minutes: 120,
            },
        )
        .unwrap();
        db.append(&Record::Feeding(FeedingEvent {
            id: id("f1"),
            timestamp: now() - Duration::hours(2),
            feeding: Feeding::Bottle { volume_ml: 90 },
        }))
        .unwrap();

        let output = render(&db);
        assert!(output.contains("Next: Time to feed (reminder every 2h 0m)"));
        assert!(output.contains("Last feeding: 2h 0m ago (Bottle)\nNext feeding due at 14:00\n"));
    }

    #[test]
    fn live_sleep_holds_back_sleep_suggestion() {
        let mut db = Database::open_in_memory().unwrap();
        db.append(&Record::Feeding(FeedingEvent {
            id: id("f1"),
            timestamp: now() - Duration::hours(1),
            feeding: Feeding::Bottle { volume_ml: 90 },
        }))
        .unwrap();
        db.append(&Record::Sleep(
            SleepEvent::new(id("nap"), now() - Duration::hours(6), now() - Duration::hours(4))
                .unwrap(),
        ))
        .unwrap();
        assert!(render(&db).contains("Next: Time to sleep (awake over 2h 0m)"));

        db.put_setting(SLEEP_START_KEY, &(now() - Duration::minutes(15)))
            .unwrap();
        assert_snapshot!(render(&db), @r"
        STATUS: Baby (0 months)

        Next: All caught up!
        Last feeding: 1h 0m ago (Bottle)
        Last wake-up: 4h 0m ago
        Last diaper: never
        Sleeping since 13:45

        Today: 1 feedings, 1 sleeps (2h 0m), 0 diapers
        ");
    }

    #[test]
    fn json_status_has_next_action() {
        let db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        run(&mut output, &db, &InsightConfig::default(), true, &now()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["next_action"]["action"], "log_first_activity");
        assert_eq!(value["next_action"]["target"], "feeding");
        assert_eq!(value["today"]["feedings"], 0);
    }
}
