//! Message collection
//!
//! - `Collector` appends inbound text to the shared daily buffer
//! - `SourcePoller` pulls messages from a second Telegram bot (the voice-note
//!   bot) via `getUpdates` and feeds them to the collector

mod collector;
mod poller;

pub use collector::{event_from_message, Collector, InboundEvent, Ingest};
pub use poller::SourcePoller;
