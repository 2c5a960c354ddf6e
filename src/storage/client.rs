use super::drive::DriveStorage;
use super::local::LocalStorage;
use crate::config::StorageConfig;
use crate::error::ServiceError;
use anyhow::Result;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a stored file contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkKind {
    /// The day's notes as sent to the analyzer
    RawInput,
    /// The analyzer's summary
    Insight,
}

impl LinkKind {
    pub fn label(&self) -> &'static str {
        match self {
            LinkKind::RawInput => "Raw notes",
            LinkKind::Insight => "Insights",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            LinkKind::RawInput => "text/plain",
            LinkKind::Insight => "text/markdown",
        }
    }

    fn file_suffix(&self) -> &'static str {
        match self {
            LinkKind::RawInput => "notes.txt",
            LinkKind::Insight => "insights.md",
        }
    }
}

/// Shareable reference to a stored file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageLink {
    pub url: String,
    pub kind: LinkKind,
}

/// Length of the flush id prefix embedded in file names
pub const FLUSH_TAG_LEN: usize = 8;

/// Date-stamped file name tagged with its flush, e.g.
/// `2025-10-28_2130_1f0c9a2b_insights.md`
///
/// Two flushes in the same minute get different names.
pub fn file_name(flushed_at: DateTime<FixedOffset>, flush_id: Uuid, kind: LinkKind) -> String {
    let id = flush_id.simple().to_string();
    format!(
        "{}_{}_{}",
        flushed_at.format("%Y-%m-%d_%H%M"),
        &id[..FLUSH_TAG_LEN],
        kind.file_suffix()
    )
}

/// Uploads a text file and returns a link to it
#[async_trait::async_trait]
pub trait StorageClient: Send + Sync {
    async fn upload(
        &self,
        content: &str,
        name: &str,
        kind: LinkKind,
    ) -> Result<StorageLink, ServiceError>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Storage backend factory
pub struct StorageBackendFactory;

impl StorageBackendFactory {
    pub fn create(config: &StorageConfig) -> Result<Box<dyn StorageClient>> {
        match config {
            StorageConfig::Local { dir } => Ok(Box::new(LocalStorage::new(dir.clone()))),

            StorageConfig::Drive {
                access_token,
                folder_id,
                base_url,
                timeout_secs,
            } => {
                let backend = DriveStorage::new(
                    access_token.clone(),
                    folder_id.clone(),
                    base_url.clone(),
                    std::time::Duration::from_secs(*timeout_secs),
                )?;
                Ok(Box::new(backend))
            }
        }
    }
}
