use crate::buffer::SharedBuffer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use teloxide::types::Message;
use tracing::{debug, info, warn};

/// A message delivered by the messaging source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    /// Chat the message was sent from
    pub chat_id: i64,

    /// Message text (or transcript / caption)
    pub text: String,

    /// When the platform received the message
    pub received_at: DateTime<Utc>,
}

/// What happened to an inbound event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Ingest {
    /// Appended; `count` is the buffer size afterwards
    Recorded { count: usize },

    /// Blank, placeholder, or from a day already flushed past
    Ignored,

    /// Sent from a chat other than the allow-listed one
    ForeignChat,
}

/// Appends inbound messages to the daily buffer
pub struct Collector {
    buffer: SharedBuffer,
    allowed_chat_id: i64,
    ignored_texts: Vec<String>,
}

impl Collector {
    pub fn new(buffer: SharedBuffer, allowed_chat_id: i64, ignored_texts: Vec<String>) -> Self {
        Self {
            buffer,
            allowed_chat_id,
            ignored_texts,
        }
    }

    /// Record `text` received at `received_at`
    ///
    /// Blank text (after trimming) and placeholder text are silently ignored.
    /// Timestamps in the future are clamped to the current time.
    pub async fn record(&self, text: &str, received_at: DateTime<Utc>) {
        self.append(text, clamp(received_at, Utc::now())).await;
    }

    /// Record an event after checking where it came from
    pub async fn ingest(&self, event: &InboundEvent) -> Ingest {
        self.ingest_at(event, Utc::now()).await
    }

    /// Same as `ingest`, with an explicit clock
    ///
    /// An event dated after `now` is recorded at `now`, so a bad client clock
    /// cannot move the buffer onto a later day.
    pub async fn ingest_at(&self, event: &InboundEvent, now: DateTime<Utc>) -> Ingest {
        if event.chat_id != self.allowed_chat_id {
            debug!("Ignoring message from foreign chat {}", event.chat_id);
            return Ingest::ForeignChat;
        }

        match self.append(&event.text, clamp(event.received_at, now)).await {
            Some(count) => Ingest::Recorded { count },
            None => Ingest::Ignored,
        }
    }

    /// Number of entries collected so far today
    pub async fn count(&self) -> usize {
        self.buffer.lock().await.len()
    }

    async fn append(&self, text: &str, received_at: DateTime<Utc>) -> Option<usize> {
        let text = text.trim();
        if text.is_empty() || self.ignored_texts.iter().any(|p| p == text) {
            return None;
        }

        let mut buffer = self.buffer.lock().await;
        if !buffer.push(text.to_string(), received_at) {
            return None;
        }

        info!("Recorded entry #{} for {:?}", buffer.len(), buffer.day_key());
        Some(buffer.len())
    }
}

fn clamp(received_at: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if received_at > now {
        warn!("Entry dated {} is in the future, recording it at {}", received_at, now);
        return now;
    }
    received_at
}

/// Build an inbound event from a Telegram message
///
/// Uses the text, falling back to the caption (voice notes forwarded with a
/// transcript). Messages with neither are skipped.
pub fn event_from_message(msg: &Message) -> Option<InboundEvent> {
    let text = msg.text().or_else(|| msg.caption())?;

    Some(InboundEvent {
        chat_id: msg.chat.id.0,
        text: text.to_string(),
        received_at: msg.date,
    })
}
