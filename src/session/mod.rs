//! Analysis session management
//!
//! The `Orchestrator` runs one `/analyze` command end to end:
//! - Snapshot the daily buffer
//! - Analyze the notes with the analyzer client
//! - Persist notes and insights with the storage client
//! - Flush the analysed entries and compose the reply

mod orchestrator;
mod reply;

pub use orchestrator::Orchestrator;
pub use reply::{AnalyzeOutcome, Reply};
