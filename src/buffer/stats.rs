use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time view of the buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferStats {
    /// Calendar day the buffer covers, if anything was recorded yet
    pub day: Option<NaiveDate>,

    /// Number of entries waiting for analysis
    pub entry_count: usize,

    /// Receipt time of the oldest entry
    pub first_at: Option<DateTime<Utc>>,

    /// Receipt time of the newest entry
    pub last_at: Option<DateTime<Utc>>,
}
