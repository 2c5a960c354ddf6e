use super::reply::{AnalyzeOutcome, Reply};
use crate::analyzer::AnalyzerClient;
use crate::buffer::{BufferStats, SharedBuffer, Snapshot};
use crate::error::InsightError;
use crate::storage::{file_name, LinkKind, StorageClient};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Runs `/analyze`: snapshot, analyze, store, flush, reply
pub struct Orchestrator {
    /// Daily buffer shared with the collector
    buffer: SharedBuffer,

    /// Generative-AI analysis
    analyzer: Arc<dyn AnalyzerClient>,

    /// File persistence
    storage: Arc<dyn StorageClient>,

    /// The only chat allowed to trigger analysis
    allowed_chat_id: i64,

    /// Held for a whole analysis so two commands never analyze the same entries
    flush_lock: Mutex<()>,
}

impl Orchestrator {
    pub fn new(
        buffer: SharedBuffer,
        analyzer: Arc<dyn AnalyzerClient>,
        storage: Arc<dyn StorageClient>,
        allowed_chat_id: i64,
    ) -> Self {
        info!(
            "Orchestrator ready (analyzer={}, storage={})",
            analyzer.name(),
            storage.name()
        );

        Self {
            buffer,
            analyzer,
            storage,
            allowed_chat_id,
            flush_lock: Mutex::new(()),
        }
    }

    pub fn is_allowed(&self, chat_id: i64) -> bool {
        chat_id == self.allowed_chat_id
    }

    /// Handle an analyze command sent by `sender`
    pub async fn handle_analyze(&self, sender: i64) -> Result<AnalyzeOutcome, InsightError> {
        self.handle_analyze_at(sender, Utc::now()).await
    }

    /// Same as `handle_analyze`, with an explicit clock
    pub async fn handle_analyze_at(
        &self,
        sender: i64,
        now: DateTime<Utc>,
    ) -> Result<AnalyzeOutcome, InsightError> {
        if !self.is_allowed(sender) {
            warn!("Rejected analyze command from chat {}", sender);
            return Err(InsightError::Permission(sender));
        }

        self.analyze_at(now).await
    }

    /// Analyze everything collected today
    pub async fn analyze(&self) -> Result<AnalyzeOutcome, InsightError> {
        self.analyze_at(Utc::now()).await
    }

    /// Analyze everything collected on the day of `now`
    pub async fn analyze_at(&self, now: DateTime<Utc>) -> Result<AnalyzeOutcome, InsightError> {
        let _flush = self.flush_lock.lock().await;

        let Some(snapshot) = self.snapshot(now).await else {
            info!("Nothing collected today, skipping analysis");
            return Ok(AnalyzeOutcome::NothingCollected);
        };

        let flush_id = Uuid::new_v4();
        let notes = snapshot.render();
        info!(
            "Analyzing {} entries for {} (flush {})",
            snapshot.len(),
            snapshot.day,
            flush_id
        );

        let summary = match self.analyzer.analyze(&notes).await {
            Ok(summary) => summary,
            Err(e) => {
                error!("Analysis failed, keeping {} entries: {}", snapshot.len(), e);
                return Err(InsightError::Analysis(e));
            }
        };

        let flushed_at = now.with_timezone(&snapshot.offset);
        let mut links = Vec::with_capacity(2);
        let mut warnings = Vec::new();

        for (kind, content) in [(LinkKind::RawInput, &notes), (LinkKind::Insight, &summary)] {
            let name = file_name(flushed_at, flush_id, kind);
            match self.storage.upload(content, &name, kind).await {
                Ok(link) => links.push(link),
                Err(e) => {
                    warn!("Failed to store {}: {}", name, e);
                    warnings.push(format!("{} not saved: {}", kind.label(), e));
                }
            }
        }

        // Analysis succeeded: the entries are consumed whatever storage did
        self.buffer.lock().await.consume(&snapshot);

        Ok(AnalyzeOutcome::Analyzed(Reply {
            flush_id,
            day: snapshot.day,
            entry_count: snapshot.len(),
            summary,
            links,
            warnings,
        }))
    }

    /// Current buffer statistics as of `now`
    pub async fn stats_at(&self, now: DateTime<Utc>) -> BufferStats {
        let mut buffer = self.buffer.lock().await;
        buffer.roll_over(now);
        buffer.stats()
    }

    pub async fn stats(&self) -> BufferStats {
        self.stats_at(Utc::now()).await
    }

    async fn snapshot(&self, now: DateTime<Utc>) -> Option<Snapshot> {
        let mut buffer = self.buffer.lock().await;
        buffer.roll_over(now);
        buffer.snapshot()
    }
}
