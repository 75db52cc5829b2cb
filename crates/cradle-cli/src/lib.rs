//! Baby care log CLI library.
//!
//! This crate provides the CLI interface for logging care events and
//! reading the insights derived from them.

mod cli;
pub mod commands;
mod config;

pub use cli::{
    Cli, Commands, DiaperArg, FeedingMethod, LogEvent, ProfileAction, SideArg, SleepAction,
};
pub use config::Config;
