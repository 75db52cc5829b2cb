//! Storage layer for baby care logs.
//!
//! Provides an append-only event log and a small key/value settings table
//! using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` instance can be moved between threads but cannot be shared
//! across threads without external synchronization.
//!
//! # Schema
//!
//! ## Timestamp Format
//!
//! Timestamps are stored as TEXT in RFC 3339 format with millisecond
//! precision (e.g., `2024-01-15T10:30:00.000Z`), so lexicographic ordering
//! matches chronological ordering. Sleeps are filed under their start time.
//!
//! ## Event Payload Storage
//!
//! The `data` column stores the JSON form of the event and the `category`
//! column says which event type it decodes to. Event IDs are unique across
//! all categories; a second insert with a known ID is ignored.
//!
//! ## Settings
//!
//! The `settings` table maps a key to a JSON value. It holds the child
//! profile, the feeding reminder and an in-progress sleep start.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use cradle_core::{
    Category, DiaperEvent, EventLog, EventStore, FeedingEvent, GrowthEvent, Record, SleepEvent,
};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Settings key for the [`cradle_core::ChildProfile`].
pub const PROFILE_KEY: &str = "child_profile";
/// Settings key for the [`cradle_core::ReminderConfig`].
pub const REMINDER_KEY: &str = "feeding_reminder";
/// Settings key for the start instant of a sleep being tracked live.
pub const SLEEP_START_KEY: &str = "sleep_in_progress";

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Failed to encode a value as JSON.
    #[error("failed to encode {what}: {source}")]
    Encode {
        what: String,
        #[source]
        source: serde_json::Error,
    },
    /// Stored event payload could not be decoded.
    #[error("invalid event data for {event_id}: {message}")]
    InvalidEventData { event_id: String, message: String },
    /// Stored setting value could not be decoded.
    #[error("invalid value for setting {key}: {source}")]
    InvalidSetting {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// A raw event row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub id: String,
    pub timestamp: String,
    pub category: String,
    pub schema_version: i64,
    pub data: String,
}

impl EventRecord {
    /// Encodes a typed record into a storable row.
    pub fn from_record(record: &Record) -> Result<Self, DbError> {
        let data = match record {
            Record::Feeding(e) => serde_json::to_string(e),
            Record::Sleep(e) => serde_json::to_string(e),
            Record::Diaper(e) => serde_json::to_string(e),
            Record::Growth(e) => serde_json::to_string(e),
        }
        .map_err(|source| DbError::Encode {
            what: format!("event {}", record.id()),
            source,
        })?;

        Ok(Self {
            id: record.id().to_string(),
            timestamp: format_timestamp(record.timestamp()),
            category: record.category().as_str().to_string(),
            schema_version: 1,
            data,
        })
    }

    /// Decodes the row back into a typed record.
    pub fn to_record(&self) -> Result<Record, DbError> {
        let category: Category = self.category.parse().map_err(|err: cradle_core::UnknownCategory| {
            DbError::InvalidEventData {
                event_id: self.id.clone(),
                message: err.to_string(),
            }
        })?;

        let record = match category {
            Category::Feeding => Record::Feeding(self.decode::<FeedingEvent>()?),
            Category::Sleep => {
                let stored = self.decode::<SleepEvent>()?;
                let sleep = SleepEvent::new(stored.id, stored.start_time, stored.end_time)
                    .map_err(|err| DbError::InvalidEventData {
                        event_id: self.id.clone(),
                        message: err.to_string(),
                    })?;
                Record::Sleep(sleep)
            }
            Category::Diaper => Record::Diaper(self.decode::<DiaperEvent>()?),
            Category::Growth => Record::Growth(self.decode::<GrowthEvent>()?),
        };
        Ok(record)
    }

    fn decode<T: DeserializeOwned>(&self) -> Result<T, DbError> {
        serde_json::from_str(&self.data).map_err(|err| DbError::InvalidEventData {
            event_id: self.id.clone(),
            message: err.to_string(),
        })
    }
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            -- Events table: append-only care log
            -- timestamp: RFC 3339 (sleeps use their start time)
            -- category: feeding | sleep | diaper | growth
            -- data: JSON payload of the event
            CREATE TABLE IF NOT EXISTS events (
                id TEXT PRIMARY KEY,
                timestamp TEXT NOT NULL,
                category TEXT NOT NULL,
                schema_version INTEGER DEFAULT 1,
                data TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_events_timestamp ON events(timestamp);
            CREATE INDEX IF NOT EXISTS idx_events_category ON events(category);

            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    /// Inserts a batch of events, ignoring duplicates by ID.
    pub fn insert_events(&mut self, events: &[EventRecord]) -> Result<usize, DbError> {
        if events.is_empty() {
            return Ok(0);
        }
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "
                INSERT OR IGNORE INTO events (id, timestamp, category, schema_version, data)
                VALUES (?, ?, ?, ?, ?)
                ",
            )?;
            for event in events {
                inserted += stmt.execute(params![
                    event.id,
                    event.timestamp,
                    event.category,
                    event.schema_version,
                    event.data,
                ])?;
            }
        }
        tx.commit()?;
        tracing::debug!(inserted, offered = events.len(), "inserted events");
        Ok(inserted)
    }

    /// Lists events ordered by timestamp then ID, optionally for one category.
    pub fn list_events(&self, category: Option<Category>) -> Result<Vec<EventRecord>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, timestamp, category, schema_version, data
            FROM events
            WHERE ?1 IS NULL OR category = ?1
            ORDER BY timestamp ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map([category.map(|c| c.as_str())], |row| {
            Ok(EventRecord {
                id: row.get(0)?,
                timestamp: row.get(1)?,
                category: row.get(2)?,
                schema_version: row.get(3)?,
                data: row.get(4)?,
            })
        })?;
        let mut events = Vec::new();
        for row in rows {
            events.push(row?);
        }
        Ok(events)
    }

    /// Loads every stored event into an [`EventLog`].
    pub fn load_log(&self) -> Result<EventLog, DbError> {
        let mut log = EventLog::default();
        for row in self.list_events(None)? {
            match row.to_record()? {
                Record::Feeding(e) => log.feedings.push(e),
                Record::Sleep(e) => log.sleeps.push(e),
                Record::Diaper(e) => log.diapers.push(e),
                Record::Growth(e) => log.growth.push(e),
            }
        }
        tracing::debug!(events = log.len(), "loaded event log");
        Ok(log)
    }

    /// Reads a setting, `None` if it was never written.
    pub fn get_setting<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, DbError> {
        let raw: Option<String> = self
            .conn
            .query_row("SELECT value FROM settings WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?;
        raw.map(|value| {
            serde_json::from_str(&value).map_err(|source| DbError::InvalidSetting {
                key: key.to_string(),
                source,
            })
        })
        .transpose()
    }

    /// Writes a setting, replacing any previous value.
    pub fn put_setting<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), DbError> {
        let json = serde_json::to_string(value).map_err(|source| DbError::Encode {
            what: format!("setting {key}"),
            source,
        })?;
        self.conn.execute(
            "
            INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key, json, format_timestamp(Utc::now())],
        )?;
        tracing::debug!(key, "stored setting");
        Ok(())
    }

    /// Removes a setting. Returns whether it existed.
    pub fn remove_setting(&mut self, key: &str) -> Result<bool, DbError> {
        let removed = self
            .conn
            .execute("DELETE FROM settings WHERE key = ?", [key])?;
        Ok(removed > 0)
    }
}

impl EventStore for Database {
    type Error = DbError;

    fn snapshot(&self) -> Result<EventLog, Self::Error> {
        self.load_log()
    }

    fn append(&mut self, record: &Record) -> Result<bool, Self::Error> {
        let row = EventRecord::from_record(record)?;
        let inserted = self.insert_events(&[row])? == 1;
        if !inserted {
            tracing::debug!(id = %record.id(), "ignored duplicate event");
        }
        Ok(inserted)
    }
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
