//! CLI subcommand implementations.

pub mod events;
pub mod log;
pub mod profile;
pub mod reminder;
pub mod report;
pub mod routine;
pub mod sleep;
pub mod status;
pub mod util;
