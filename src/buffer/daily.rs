use super::entry::Entry;
use super::stats::BufferStats;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Buffer handle shared by the collector and the orchestrator
pub type SharedBuffer = Arc<Mutex<DailyBuffer>>;

/// Per-day accumulator of collected entries
///
/// All entries share the buffer's `day_key`. A message from a later day
/// discards whatever the previous day left un-analyzed and starts over.
#[derive(Debug)]
pub struct DailyBuffer {
    /// Offset used to decide which calendar day a timestamp belongs to
    offset: FixedOffset,

    /// Day currently covered (None until the first entry arrives)
    day_key: Option<NaiveDate>,

    /// Entries in insertion (chronological) order
    entries: Vec<Entry>,
}

/// Copy of the buffer taken at the start of an analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub day: NaiveDate,
    pub offset: FixedOffset,
    pub entries: Vec<Entry>,
}

impl Snapshot {
    /// One entry per line, oldest first
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.render(&self.offset))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DailyBuffer {
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            offset,
            day_key: None,
            entries: Vec::new(),
        }
    }

    /// Create an empty buffer wrapped for sharing
    pub fn shared(offset: FixedOffset) -> SharedBuffer {
        Arc::new(Mutex::new(Self::new(offset)))
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Calendar day of `at` in the buffer's offset
    pub fn day_of(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    pub fn day_key(&self) -> Option<NaiveDate> {
        self.day_key
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move the buffer forward to the day of `now`
    ///
    /// Returns the number of stale entries discarded. Never moves backwards.
    pub fn roll_over(&mut self, now: DateTime<Utc>) -> usize {
        let today = self.day_of(now);

        match self.day_key {
            Some(day) if day >= today => 0,
            Some(day) => {
                let discarded = self.entries.len();
                if discarded > 0 {
                    warn!(
                        "New day {}: discarding {} un-analyzed entries from {}",
                        today, discarded, day
                    );
                }
                self.entries.clear();
                self.day_key = Some(today);
                discarded
            }
            None => {
                self.day_key = Some(today);
                0
            }
        }
    }

    /// Append an entry received at `received_at`
    ///
    /// `text` must already be trimmed and non-empty. Returns false when the
    /// entry belongs to a day the buffer has already moved past.
    pub fn push(&mut self, text: String, received_at: DateTime<Utc>) -> bool {
        self.roll_over(received_at);

        if self.day_key != Some(self.day_of(received_at)) {
            debug!(
                "Dropping entry from {} (buffer is on {:?})",
                self.day_of(received_at),
                self.day_key
            );
            return false;
        }

        self.entries.push(Entry::new(text, received_at));
        true
    }

    /// Copy of the current entries, or None when there is nothing to analyze
    pub fn snapshot(&self) -> Option<Snapshot> {
        let day = self.day_key?;
        if self.entries.is_empty() {
            return None;
        }

        Some(Snapshot {
            day,
            offset: self.offset,
            entries: self.entries.clone(),
        })
    }

    /// Remove the entries covered by `snapshot`
    ///
    /// Entries appended after the snapshot was taken are kept. If the buffer
    /// rolled over to another day in the meantime, nothing is removed.
    pub fn consume(&mut self, snapshot: &Snapshot) -> usize {
        if self.day_key != Some(snapshot.day) {
            return 0;
        }

        let count = snapshot.len().min(self.entries.len());
        self.entries.drain(..count);

        info!(
            "Flushed {} entries for {} ({} remaining)",
            count,
            snapshot.day,
            self.entries.len()
        );

        count
    }

    pub fn stats(&self) -> BufferStats {
        BufferStats {
            day: self.day_key,
            entry_count: self.entries.len(),
            first_at: self.entries.first().map(|e| e.timestamp),
            last_at: self.entries.last().map(|e| e.timestamp),
        }
    }
}
