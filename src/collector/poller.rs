use super::collector::{event_from_message, Collector, Ingest};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::types::UpdateKind;
use tracing::{info, warn};

/// Polls the source bot's `getUpdates` and feeds messages to the collector
///
/// The source bot must not be polled by anything else: Telegram only keeps
/// one consumer's offset per bot.
pub struct SourcePoller {
    bot: Bot,
    collector: Arc<Collector>,
    interval: Duration,
    offset: i32,
}

impl SourcePoller {
    pub fn new(token: String, collector: Arc<Collector>, interval: Duration) -> Self {
        Self {
            bot: Bot::new(token),
            collector,
            interval,
            offset: 0,
        }
    }

    /// Talk to a different Bot API server (self-hosted, or a local fake)
    pub fn with_api_url(mut self, url: reqwest::Url) -> Self {
        self.bot = self.bot.set_api_url(url);
        self
    }

    /// Next update id to ask for
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Poll forever, logging failures and carrying on
    pub async fn run(mut self) {
        info!("Source poller started (every {:?})", self.interval);

        loop {
            match self.poll_once().await {
                Ok(0) => {}
                Ok(recorded) => info!("Collected {} messages from source bot", recorded),
                Err(e) => warn!("Source poll failed: {:#}", e),
            }

            tokio::time::sleep(self.interval).await;
        }
    }

    /// Fetch pending updates once; returns how many entries were recorded
    pub async fn poll_once(&mut self) -> Result<usize> {
        let updates = self
            .bot
            .get_updates()
            .offset(self.offset)
            .await
            .context("Failed to fetch source bot updates")?;

        let mut recorded = 0;
        for update in updates {
            self.offset = self.offset.max(update.id.0 as i32 + 1);

            let UpdateKind::Message(msg) = &update.kind else {
                continue;
            };

            if let Some(event) = event_from_message(msg) {
                if let Ingest::Recorded { .. } = self.collector.ingest(&event).await {
                    recorded += 1;
                }
            }
        }

        Ok(recorded)
    }
}
