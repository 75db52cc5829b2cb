//! Time windows for selecting events.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A span of time events are selected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Window {
    /// The trailing `n` hours up to now.
    LastHours(u32),
    /// The trailing `n` days up to now.
    LastDays(u32),
    /// An explicit range.
    Range {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl Window {
    /// Resolves the window into concrete `(start, end)` bounds.
    ///
    /// Both bounds are inclusive. A span reaching past the earliest
    /// representable instant starts there instead.
    pub fn bounds(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let trailing = |span: Option<Duration>| {
            span.and_then(|span| now.checked_sub_signed(span))
                .unwrap_or(DateTime::<Utc>::MIN_UTC)
        };
        match *self {
            Self::LastHours(h) => (trailing(Duration::try_hours(i64::from(h))), now),
            Self::LastDays(d) => (trailing(Duration::try_days(i64::from(d))), now),
            Self::Range { start, end } => (start, end),
        }
    }

    /// Whether `t` falls inside the window.
    pub fn contains(&self, t: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let (start, end) = self.bounds(now);
        start <= t && t <= end
    }
}

/// Selects the records whose time falls inside `window`.
///
/// Input order is preserved and nothing is cloned; an empty result is not an
/// error. Unsorted input is fine.
pub fn filter<'a, R, F>(
    records: &'a [R],
    time_of: F,
    window: Window,
    now: DateTime<Utc>,
) -> Vec<&'a R>
where
    F: Fn(&R) -> DateTime<Utc>,
{
    let (start, end) = window.bounds(now);
    records
        .iter()
        .filter(|r| {
            let t = time_of(*r);
            start <= t && t <= end
        })
        .collect()
}

/// Whether `t` falls on the same calendar day as `now`, in `now`'s timezone.
pub fn is_same_day<Tz: TimeZone>(t: DateTime<Utc>, now: &DateTime<Tz>) -> bool {
    t.with_timezone(&now.timezone()).date_naive() == now.date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn at(day: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, day, h, 0, 0).unwrap()
    }

    #[test]
    fn last_days_is_inclusive_and_a_subset() {
        let now = at(20, 12);
        let times = vec![at(13, 12), at(13, 11), at(19, 0), at(20, 12), at(20, 13)];

        let kept = filter(&times, |t| *t, Window::LastDays(7), now);

        assert_eq!(kept, vec![&times[0], &times[2], &times[3]]);
        for t in &kept {
            assert!(**t >= now - Duration::days(7));
            assert!(times.contains(*t));
        }
    }

    #[test]
    fn last_hours_preserves_unsorted_order() {
        let now = at(20, 12);
        let times = vec![at(20, 11), at(20, 1), at(20, 9), at(19, 11)];

        let kept = filter(&times, |t| *t, Window::LastHours(24), now);

        assert_eq!(kept, vec![&times[0], &times[1], &times[2]]);
    }

    #[test]
    fn explicit_range_includes_both_bounds() {
        let window = Window::Range {
            start: at(10, 0),
            end: at(11, 0),
        };
        let now = at(20, 0);
        assert!(window.contains(at(10, 0), now));
        assert!(window.contains(at(11, 0), now));
        assert!(!window.contains(at(11, 1), now));
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let times = vec![at(10, 5)];
        let window = Window::Range {
            start: at(11, 0),
            end: at(10, 0),
        };
        assert!(filter(&times, |t| *t, window, at(20, 0)).is_empty());
    }

    #[test]
    fn huge_trailing_window_keeps_everything() {
        let now = at(20, 0);
        let (start, end) = Window::LastDays(u32::MAX).bounds(now);
        assert_eq!(start, DateTime::<Utc>::MIN_UTC);
        assert_eq!(end, now);

        let times = vec![at(1, 0), at(19, 0)];
        assert_eq!(filter(&times, |t| *t, Window::LastHours(u32::MAX), now).len(), 2);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let times: Vec<DateTime<Utc>> = Vec::new();
        assert!(filter(&times, |t| *t, Window::LastDays(7), at(20, 0)).is_empty());
    }

    #[test]
    fn same_day_uses_the_callers_timezone() {
        // 23:30 UTC on the 19th is already the 20th at UTC+3.
        let t = Utc.with_ymd_and_hms(2025, 5, 19, 23, 30, 0).unwrap();
        let plus3 = FixedOffset::east_opt(3 * 3600).unwrap();
        let now_plus3 = at(20, 10).with_timezone(&plus3);
        assert!(is_same_day(t, &now_plus3));
        assert!(!is_same_day(t, &at(20, 10)));
    }
}
