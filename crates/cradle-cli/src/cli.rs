//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use cradle_core::{BreastSide, Category, DiaperKind};

/// Baby care log.
///
/// Records feedings, sleeps, diapers and growth, and turns them into
/// suggestions, sleep budgets and daily routines.
#[derive(Debug, Parser)]
#[command(name = "cradle", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log a care event.
    Log {
        #[command(subcommand)]
        event: LogEvent,
    },

    /// Track a sleep as it happens, or show the sleep report.
    #[command(subcommand)]
    Sleep(SleepAction),

    /// Manage the child profile.
    #[command(subcommand)]
    Profile(ProfileAction),

    /// Show or change the feeding reminder.
    Reminder {
        /// Turn the reminder on.
        #[arg(long, conflicts_with = "disable")]
        enable: bool,

        /// Turn the reminder off.
        #[arg(long)]
        disable: bool,

        /// Minutes between feedings before the reminder fires.
        #[arg(long)]
        interval: Option<i64>,
    },

    /// Show the next suggested action and the latest events.
    Status {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show rhythms and today's timeline with projected events.
    Routine {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Summarize a period (defaults to the last 7 days).
    Report {
        /// Last 7 days.
        #[arg(long, conflicts_with_all = ["month", "from"])]
        week: bool,

        /// Last 30 days.
        #[arg(long, conflicts_with = "from")]
        month: bool,

        /// Start of a custom range (ISO 8601 or relative, e.g. "3 days ago").
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// End of a custom range.
        #[arg(long, requires = "from")]
        to: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Dump logged events as JSONL.
    Events {
        /// Only events of this category.
        #[arg(long)]
        category: Option<Category>,
    },
}

/// Event kinds that can be logged.
#[derive(Debug, Subcommand)]
pub enum LogEvent {
    /// Log a feeding.
    Feeding {
        #[command(subcommand)]
        method: FeedingMethod,
    },

    /// Log a completed sleep.
    Sleep {
        /// When the sleep started.
        #[arg(long)]
        start: String,

        /// When the sleep ended.
        #[arg(long)]
        end: String,
    },

    /// Log a diaper change.
    Diaper {
        /// What the diaper contained.
        kind: DiaperArg,

        /// When it happened (defaults to now).
        #[arg(long)]
        at: Option<String>,
    },

    /// Log a weight and height measurement.
    Growth {
        /// Weight in kilograms.
        #[arg(long)]
        weight: f64,

        /// Height in centimetres.
        #[arg(long)]
        height: f64,

        /// When it was measured (defaults to now).
        #[arg(long)]
        at: Option<String>,
    },
}

/// How a feeding was given.
#[derive(Debug, Subcommand)]
pub enum FeedingMethod {
    /// Breastfeeding.
    Breast {
        /// Which side.
        #[arg(long, value_enum)]
        side: SideArg,

        /// How long it lasted.
        #[arg(long)]
        minutes: u32,

        /// When it happened (defaults to now).
        #[arg(long)]
        at: Option<String>,
    },

    /// Bottle feeding.
    Bottle {
        /// Volume in millilitres.
        #[arg(long)]
        ml: u32,

        /// When it happened (defaults to now).
        #[arg(long)]
        at: Option<String>,
    },
}

/// Live sleep tracking actions.
#[derive(Debug, Subcommand)]
pub enum SleepAction {
    /// Mark the baby as asleep.
    Start {
        #[arg(long)]
        at: Option<String>,
    },

    /// Mark the baby as awake and log the sleep.
    Stop {
        #[arg(long)]
        at: Option<String>,
    },

    /// Show the sleep budget, advice and feed-to-sleep pattern.
    Report {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Child profile actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// Update the profile. Omitted fields keep their value.
    Set {
        #[arg(long)]
        name: Option<String>,

        /// Birth date as YYYY-MM-DD.
        #[arg(long)]
        birth_date: Option<NaiveDate>,
    },

    /// Show the profile and current age.
    Show,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SideArg {
    Left,
    Right,
    Both,
}

impl From<SideArg> for BreastSide {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Left => Self::Left,
            SideArg::Right => Self::Right,
            SideArg::Both => Self::Both,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DiaperArg {
    Wet,
    Dirty,
    Both,
}

impl From<DiaperArg> for DiaperKind {
    fn from(kind: DiaperArg) -> Self {
        match kind {
            DiaperArg::Wet => Self::Wet,
            DiaperArg::Dirty => Self::Dirty,
            DiaperArg::Both => Self::Both,
        }
    }
}
