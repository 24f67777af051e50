use anyhow::Result;
use gastos_bot::bot::{self, BotContext, Command};
use gastos_bot::config::BotConfig;
use gastos_bot::ocr::TrOcrClient;
use gastos_bot::store::{LedgerBackend, LedgerStore};
use log::info;
use std::sync::Arc;
use teloxide::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    info!("Starting Gastos Telegram Bot");

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Load immutable configuration (config file + environment)
    let config = Arc::new(BotConfig::load()?);

    let store: Arc<dyn LedgerBackend> = Arc::new(LedgerStore::new(&config)?);
    let ocr = Arc::new(TrOcrClient::new(config.hf_token.clone()));

    let bot = Bot::new(config.telegram_token.clone());

    let ctx = BotContext {
        config,
        store,
        ocr,
    };

    info!("Bot initialized, starting dispatcher");

    // Commands first; everything else falls through to the message handler.
    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(bot::command_handler),
        )
        .branch(Update::filter_message().endpoint(bot::message_handler));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![ctx])
        .default_handler(|upd| async move {
            log::warn!("Unhandled update {:?}", upd);
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error has occured in the dispatcher",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
