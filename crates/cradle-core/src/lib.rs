//! Derived-insight engine for baby care logs.
//!
//! This crate turns raw feeding, sleep, diaper and growth records into:
//! - Next-action suggestions for the dashboard
//! - Sleep budgets against an age-indexed recommendation
//! - Feed-to-sleep patterns, rhythms and today's projected timeline
//! - Daily summaries and period reports
//!
//! Everything here is pure: callers pass `now` and the records explicitly.

pub mod advisor;
pub mod category;
pub mod config;
pub mod event;
mod format;
pub mod interval;
pub mod pattern;
pub mod profile;
pub mod report;
pub mod sleep_budget;
pub mod store;
pub mod summary;
pub mod timeline;
pub mod types;
pub mod window;

pub use advisor::{Action, AdvisorState, NextAction, Trigger, next_action};
pub use category::{Category, UnknownCategory};
pub use config::{
    AgeBand, InsightConfig, MAX_THRESHOLD_MINUTES, MAX_WINDOW_DAYS, RecommendedRange, ReminderConfig,
};
pub use event::{
    BreastSide, DiaperEvent, DiaperKind, Feeding, FeedingEvent, GrowthEvent, Record, SleepEvent,
};
pub use format::{format_duration, format_elapsed};
pub use pattern::{FeedingPattern, find_pattern};
pub use profile::ChildProfile;
pub use report::{PeriodReport, period_report};
pub use sleep_budget::SleepBudget;
pub use store::{EventLog, EventStore};
pub use summary::{DailySummary, DiaperStats, GrowthDelta, diaper_stats, growth_delta, summarize_day};
pub use timeline::{EntryKind, TimelineEntry, build_today};
pub use types::{EventId, ValidationError};
pub use window::Window;
