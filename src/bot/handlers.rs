use super::dispatch::BotState;
use super::format::{
    render_error, render_outcome, render_stats, split_message, MAX_MESSAGE_LEN, UNAUTHORIZED,
    WELCOME,
};
use crate::collector::{event_from_message, Ingest};
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use teloxide::utils::command::BotCommands;
use tracing::{debug, info};

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Daily Insights commands:")]
pub enum Command {
    #[command(description = "show the welcome message")]
    Start,
    #[command(description = "show this help")]
    Help,
    #[command(description = "analyze today's notes")]
    Analyze,
    #[command(description = "show how many notes were collected today")]
    Status,
}

pub(crate) async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: Arc<BotState>,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;
    info!("Handling {:?} from chat {}", cmd, chat_id);

    match cmd {
        Command::Start => {
            bot.send_message(chat_id, WELCOME).await?;
        }
        Command::Help => {
            bot.send_message(chat_id, Command::descriptions().to_string())
                .await?;
        }
        Command::Status => {
            if !state.orchestrator.is_allowed(chat_id.0) {
                bot.send_message(chat_id, UNAUTHORIZED).await?;
                return Ok(());
            }
            let stats = state.orchestrator.stats().await;
            bot.send_message(chat_id, render_stats(&stats)).await?;
        }
        Command::Analyze => analyze(&bot, chat_id, &state).await?,
    }

    Ok(())
}

async fn analyze(bot: &Bot, chat_id: ChatId, state: &BotState) -> ResponseResult<()> {
    if state.orchestrator.is_allowed(chat_id.0) {
        let pending = state.orchestrator.stats().await.entry_count;
        if pending > 0 {
            bot.send_message(
                chat_id,
                format!("✅ Found {} messages\n\n🤖 Analyzing with AI...", pending),
            )
            .await?;
        }
    }

    let text = match state.orchestrator.handle_analyze(chat_id.0).await {
        Ok(outcome) => render_outcome(&outcome),
        Err(e) => render_error(&e),
    };

    for chunk in split_message(&text, MAX_MESSAGE_LEN) {
        if chunk.trim().is_empty() {
            continue;
        }
        bot.send_message(chat_id, chunk).await?;
    }

    Ok(())
}

pub(crate) async fn handle_message(msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    let Some(event) = event_from_message(&msg) else {
        debug!("Skipping message without text from chat {}", msg.chat.id);
        return Ok(());
    };

    match state.collector.ingest(&event).await {
        Ingest::Recorded { count } => debug!("Buffered message ({} today)", count),
        Ingest::Ignored => debug!("Ignored blank or placeholder message"),
        Ingest::ForeignChat => debug!("Ignored message from chat {}", event.chat_id),
    }

    Ok(())
}
