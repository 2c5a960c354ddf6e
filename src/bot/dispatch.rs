use super::handlers::{handle_command, handle_message, Command};
use crate::collector::Collector;
use crate::session::Orchestrator;
use anyhow::Result;
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};

/// Shared state injected into every handler
pub struct BotState {
    pub collector: Arc<Collector>,
    pub orchestrator: Arc<Orchestrator>,
}

/// Commands first, everything else goes to the collector
pub fn schema() -> UpdateHandler<teloxide::RequestError> {
    Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(dptree::endpoint(handle_message))
}

/// Long-poll the bot until Ctrl-C
pub async fn run(bot_token: String, state: Arc<BotState>) -> Result<()> {
    let bot = Bot::new(bot_token);

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!("Failed to register bot commands: {}", e);
    }

    info!("Telegram bot is running, send /analyze to get daily insights");

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
