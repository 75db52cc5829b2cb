//! Profile command for the child's name and birth date.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, TimeZone};
use cradle_core::ChildProfile;
use cradle_db::{Database, PROFILE_KEY};

/// Updates the stored profile. Fields left as `None` keep their value.
pub fn set<W: Write, Tz: TimeZone>(
    writer: &mut W,
    db: &mut Database,
    name: Option<String>,
    birth_date: Option<NaiveDate>,
    now: &DateTime<Tz>,
) -> Result<()> {
    let mut profile: ChildProfile = db.get_setting(PROFILE_KEY)?.unwrap_or_default();
    if let Some(name) = name {
        profile.name = name.trim().to_string();
    }
    if let Some(date) = birth_date {
        if date > now.date_naive() {
            anyhow::bail!("birth date {date} is in the future");
        }
        profile.birth_date = Some(date);
    }
    db.put_setting(PROFILE_KEY, &profile)?;
    write_profile(writer, &profile, now)
}

pub fn show<W: Write, Tz: TimeZone>(writer: &mut W, db: &Database, now: &DateTime<Tz>) -> Result<()> {
    let profile: ChildProfile = db.get_setting(PROFILE_KEY)?.unwrap_or_default();
    write_profile(writer, &profile, now)
}

fn write_profile<W: Write, Tz: TimeZone>(
    writer: &mut W,
    profile: &ChildProfile,
    now: &DateTime<Tz>,
) -> Result<()> {
    writeln!(writer, "Name: {}", profile.display_name())?;
    match profile.birth_date {
        Some(date) => {
            writeln!(writer, "Born: {date}")?;
            writeln!(writer, "Age: {}", profile.age_label(now))?;
        }
        None => writeln!(writer, "Born: not set (age-based advice assumes a newborn)")?,
    }
    Ok(())
}
