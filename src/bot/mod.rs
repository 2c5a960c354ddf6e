//! Telegram front end
//!
//! - `/start`, `/help`: static texts
//! - `/analyze`: run the orchestrator for the sender's chat
//! - `/status`: entries collected so far today
//! - any other message: handed to the collector

mod dispatch;
mod format;
mod handlers;

pub use dispatch::{run, schema, BotState};
pub use format::{
    render_error, render_outcome, render_reply, render_stats, split_message, utf16_len,
    MAX_MESSAGE_LEN, NOTHING_COLLECTED, UNAUTHORIZED, WELCOME,
};
pub use handlers::Command;
