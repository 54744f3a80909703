//! Player-facing event history
//!
//! Entries are stamped with the day and step they happened on. The log is
//! capped and keeps the newest entry first.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

pub const HISTORY_CAPACITY: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub day: u32,
    #[serde(default)]
    pub step_in_day: u32,
    pub actor: String,
    /// Short gain/loss badge, e.g. "+2🪵" or "❌"
    #[serde(default)]
    pub gained: String,
    pub description: String,
    /// Tile change or location, e.g. "🌳 -> 🌿"
    #[serde(default)]
    pub map_detail: String,
    #[serde(default)]
    pub timer_detail: String,
    /// Wall-clock milliseconds since the Unix epoch
    #[serde(default)]
    pub timestamp: u64,
}

impl HistoryEntry {
    pub fn new(actor: &str, description: impl Into<String>) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self {
            day: 0,
            step_in_day: 0,
            actor: actor.to_string(),
            gained: String::new(),
            description: description.into(),
            map_detail: String::new(),
            timer_detail: String::new(),
            timestamp,
        }
    }

    pub fn gained(mut self, gained: impl Into<String>) -> Self {
        self.gained = gained.into();
        self
    }

    pub fn map(mut self, detail: impl Into<String>) -> Self {
        self.map_detail = detail.into();
        self
    }

    pub fn timer(mut self, detail: impl Into<String>) -> Self {
        self.timer_detail = detail.into();
        self
    }

    pub fn stamped(mut self, day: u32, step: u32) -> Self {
        self.day = day;
        self.step_in_day = step;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Trim an oversized log loaded from disk
    pub fn normalize(&mut self) {
        self.entries.truncate(HISTORY_CAPACITY);
    }
}
