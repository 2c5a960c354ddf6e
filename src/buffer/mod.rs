//! Daily message buffer
//!
//! The buffer is the only in-memory state of the bot: the day's collected
//! entries, keyed by calendar day. It is created once at startup and shared
//! (behind a tokio mutex) between the collector, which appends, and the
//! orchestrator, which snapshots and consumes.

mod daily;
mod entry;
mod stats;

pub use daily::{DailyBuffer, SharedBuffer, Snapshot};
pub use entry::Entry;
pub use stats::BufferStats;
