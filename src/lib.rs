pub mod analyzer;
pub mod bot;
pub mod buffer;
pub mod collector;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod storage;

pub use analyzer::{AnalyzerClient, GeminiAnalyzer};
pub use buffer::{BufferStats, DailyBuffer, Entry, SharedBuffer, Snapshot};
pub use collector::{Collector, InboundEvent, Ingest, SourcePoller};
pub use config::Config;
pub use error::{InsightError, ServiceError};
pub use http::{create_router, AppState};
pub use session::{AnalyzeOutcome, Orchestrator, Reply};
pub use storage::{LinkKind, StorageBackendFactory, StorageClient, StorageLink};
