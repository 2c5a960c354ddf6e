use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// A single collected message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Transcribed text, already trimmed
    pub text: String,

    /// When the message was received
    pub timestamp: DateTime<Utc>,
}

impl Entry {
    pub fn new(text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            text: text.into(),
            timestamp,
        }
    }

    /// Render as a transcript line, e.g. `[09:15] Felt focused`
    pub fn render(&self, offset: &FixedOffset) -> String {
        format!(
            "[{}] {}",
            self.timestamp.with_timezone(offset).format("%H:%M"),
            self.text
        )
    }
}
