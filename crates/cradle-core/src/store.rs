//! The store seam: a snapshot of all logged events and the trait that yields it.

use std::convert::Infallible;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::event::{DiaperEvent, FeedingEvent, GrowthEvent, Record, SleepEvent};
use crate::types::EventId;

/// An owned snapshot of the event log, one collection per category.
///
/// Collections are in no particular order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    #[serde(default)]
    pub feedings: Vec<FeedingEvent>,
    #[serde(default)]
    pub sleeps: Vec<SleepEvent>,
    #[serde(default)]
    pub diapers: Vec<DiaperEvent>,
    #[serde(default)]
    pub growth: Vec<GrowthEvent>,
}

impl EventLog {
    pub fn contains(&self, id: &EventId) -> bool {
        self.feedings.iter().any(|e| &e.id == id)
            || self.sleeps.iter().any(|e| &e.id == id)
            || self.diapers.iter().any(|e| &e.id == id)
            || self.growth.iter().any(|e| &e.id == id)
    }

    pub fn len(&self) -> usize {
        self.feedings.len() + self.sleeps.len() + self.diapers.len() + self.growth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Feeding => self.feedings.len(),
            Category::Sleep => self.sleeps.len(),
            Category::Diaper => self.diapers.len(),
            Category::Growth => self.growth.len(),
        }
    }

    /// Every record as a [`Record`], ordered by its filing time.
    pub fn records(&self) -> Vec<Record> {
        let mut records: Vec<Record> = self
            .feedings
            .iter()
            .cloned()
            .map(Record::Feeding)
            .chain(self.sleeps.iter().cloned().map(Record::Sleep))
            .chain(self.diapers.iter().cloned().map(Record::Diaper))
            .chain(self.growth.iter().cloned().map(Record::Growth))
            .collect();
        records.sort_by_key(Record::timestamp);
        records
    }
}

/// Where events come from and go to.
///
/// Implementations keep records immutable once appended and ignore a record
/// whose ID is already present.
pub trait EventStore {
    type Error;

    /// Everything logged so far.
    fn snapshot(&self) -> Result<EventLog, Self::Error>;

    /// Appends a record. Returns `false` if its ID already existed.
    fn append(&mut self, record: &Record) -> Result<bool, Self::Error>;
}

impl EventStore for EventLog {
    type Error = Infallible;

    fn snapshot(&self) -> Result<EventLog, Self::Error> {
        Ok(self.clone())
    }

    fn append(&mut self, record: &Record) -> Result<bool, Self::Error> {
        if self.contains(record.id()) {
            return Ok(false);
        }
        match record {
            Record::Feeding(e) => self.feedings.push(e.clone()),
            Record::Sleep(e) => self.sleeps.push(e.clone()),
            Record::Diaper(e) => self.diapers.push(e.clone()),
            Record::Growth(e) => self.growth.push(e.clone()),
        }
        Ok(true)
    }
}
