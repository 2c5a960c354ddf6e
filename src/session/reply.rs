use crate::storage::StorageLink;
use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

/// Result of an analysis that reached the analyzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    /// Identifies this flush in logs and stored files
    pub flush_id: Uuid,

    /// Day the analysed notes belong to
    pub day: NaiveDate,

    /// Number of entries analysed
    pub entry_count: usize,

    /// Insight summary from the analyzer
    pub summary: String,

    /// Links to stored files (zero, one or two)
    pub links: Vec<StorageLink>,

    /// Storage failures, reported alongside the summary
    pub warnings: Vec<String>,
}

/// Successful outcome of `/analyze`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AnalyzeOutcome {
    /// Buffer was empty; no external calls were made
    NothingCollected,

    Analyzed(Reply),
}

impl AnalyzeOutcome {
    pub fn reply(&self) -> Option<&Reply> {
        match self {
            AnalyzeOutcome::Analyzed(reply) => Some(reply),
            AnalyzeOutcome::NothingCollected => None,
        }
    }
}
