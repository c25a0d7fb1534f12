//! Race control messages, newest first.
//!
//! [`RaceControlFeed`] accumulates the provider's list across polls. The
//! provider returns the whole session history on every poll, so a message is
//! identified by (timestamp, text, driver) and admitted at most once per
//! activation, even after it has been evicted. Retained entries are ordered by
//! timestamp and only the newest `limit` survive. A feed belongs to one
//! dashboard activation; nothing is shared between activations.

use std::collections::HashSet;

use time::OffsetDateTime;

use crate::config::DEFAULT_RACE_CONTROL_LIMIT;
use crate::openf1::RaceControlRecord;
use crate::views::format::format_clock;
use crate::views::latest::parse_timestamp;
use crate::views::timing::non_empty;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceControlRow {
    /// `HH:MM:SS` UTC.
    pub time: String,
    pub category: Option<String>,
    pub flag: Option<String>,
    pub message: String,
    pub driver_number: Option<u32>,
    pub lap: Option<u32>,
}

impl From<&RaceControlRecord> for RaceControlRow {
    fn from(record: &RaceControlRecord) -> Self {
        Self {
            time: format_clock(parse_timestamp(record.date.as_deref())),
            category: non_empty(record.category.as_deref()).map(str::to_string),
            flag: non_empty(record.flag.as_deref()).map(str::to_string),
            message: record.message.as_deref().unwrap_or_default().trim().to_string(),
            driver_number: record.driver_number,
            lap: record.lap_number,
        }
    }
}

type MessageKey = (Option<String>, Option<String>, Option<u32>);

fn message_key(record: &RaceControlRecord) -> MessageKey {
    (record.date.clone(), record.message.clone(), record.driver_number)
}

/// Retained message with its sort position. `arrival` breaks timestamp ties
/// so messages sharing a timestamp keep provider order.
#[derive(Debug, Clone)]
struct Entry {
    at: Option<OffsetDateTime>,
    arrival: u64,
    batch: u64,
    record: RaceControlRecord,
}

#[derive(Debug, Clone)]
pub struct RaceControlFeed {
    limit: usize,
    /// Every key admitted during this activation, evicted ones included.
    seen: HashSet<MessageKey>,
    /// Oldest first by (timestamp, arrival).
    entries: Vec<Entry>,
    arrivals: u64,
    batches: u64,
}

impl RaceControlFeed {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            seen: HashSet::new(),
            entries: Vec::with_capacity(limit),
            arrivals: 0,
            batches: 0,
        }
    }

    /// Merge a polled list. Returns how many of its messages are now retained
    /// that were not before; re-polling an unchanged history returns 0 and
    /// leaves the feed untouched.
    pub fn merge(&mut self, batch: &[RaceControlRecord]) -> usize {
        self.batches += 1;
        let mut admitted = false;
        for record in batch {
            if !self.seen.insert(message_key(record)) {
                continue;
            }
            self.arrivals += 1;
            self.entries.push(Entry {
                at: parse_timestamp(record.date.as_deref()),
                arrival: self.arrivals,
                batch: self.batches,
                record: record.clone(),
            });
            admitted = true;
        }
        if !admitted {
            return 0;
        }

        // Unparseable timestamps sort below every parsed one.
        self.entries.sort_by_key(|entry| (entry.at, entry.arrival));
        let excess = self.entries.len().saturating_sub(self.limit);
        self.entries = self.entries.split_off(excess);
        self.entries.iter().filter(|entry| entry.batch == self.batches).count()
    }

    /// Retained messages, newest first.
    #[must_use]
    pub fn rows(&self) -> Vec<RaceControlRow> {
        self.entries.iter().rev().map(|entry| RaceControlRow::from(&entry.record)).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RaceControlFeed {
    fn default() -> Self {
        Self::new(DEFAULT_RACE_CONTROL_LIMIT)
    }
}

#[cfg(test)]
#[path = "race_control_test.rs"]
mod tests;
