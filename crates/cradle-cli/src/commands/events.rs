//! Events command for dumping the local log.
//!
//! This module outputs events from the local database as JSONL, oldest first.

use std::io::Write;

use anyhow::Result;
use cradle_core::Category;
use cradle_db::Database;

/// Runs the events command, writing one JSON object per line.
pub fn run<W: Write>(writer: &mut W, db: &Database, category: Option<Category>) -> Result<()> {
    for row in db.list_events(category)? {
        let record = row.to_record()?;
        writeln!(writer, "{}", serde_json::to_string(&record)?)?;
    }
    Ok(())
}
