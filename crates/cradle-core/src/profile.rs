//! The child whose care is being logged.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Length of a "month" when converting age, in days.
const DAYS_PER_MONTH: i64 = 30;

/// Name and birth date of the child.
///
/// The birth date is only used to place the child in an age band; every
/// age-dependent computation receives the profile explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
}

impl ChildProfile {
    /// Whole 30-day months since birth.
    ///
    /// A missing birth date, or one in the future, yields 0.
    pub fn age_in_months<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> u32 {
        let Some(birth) = self.birth_date else {
            return 0;
        };
        let born_at = birth.and_time(chrono::NaiveTime::MIN).and_utc();
        let days = (now.with_timezone(&Utc) - born_at).num_days();
        if days <= 0 {
            return 0;
        }
        u32::try_from(days / DAYS_PER_MONTH).unwrap_or(u32::MAX)
    }

    /// Human-readable age, e.g. "5 months" or "1 year and 2 months".
    pub fn age_label<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> String {
        let months = self.age_in_months(now);
        let years = months / 12;
        let remaining = months % 12;
        if years > 0 {
            format!("{} and {}", plural(years, "year"), plural(remaining, "month"))
        } else {
            plural(months, "month")
        }
    }

    /// Display name, falling back to a generic one.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "Baby"
        } else {
            self.name.trim()
        }
    }
}

fn plural(n: u32, unit: &str) -> String {
    if n == 1 {
        format!("{n} {unit}")
    } else {
        format!("{n} {unit}s")
    }
}
