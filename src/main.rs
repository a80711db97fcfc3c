use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{info, warn};

use feedback_relay::bot::{message_handler, AppContext};
use feedback_relay::config::Config;
use feedback_relay::logging::{init_tracing, LogFormat};
use feedback_relay::transport::{InboundText, TelegramTransport};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_tracing(LogFormat::from_env())?;

    info!("Starting Feedback Relay Telegram Bot");

    let config = Config::from_env()?;
    info!(
        admin_id = %config.admin_id,
        locale = %config.locale,
        state_ttl_secs = config.state_ttl.map(|ttl| ttl.num_seconds()),
        "Configuration loaded"
    );

    let bot = Bot::new(config.bot_token.clone());

    // Polling only works without a webhook; stale updates are not replayed.
    if let Err(e) = bot.delete_webhook().drop_pending_updates(true).await {
        warn!(error = %e, "Failed to delete webhook");
    }

    let transport = Arc::new(TelegramTransport::new(bot.clone()));
    let ctx = Arc::new(AppContext::from_config(transport, &config));

    info!(
        language = ctx.localizer.language(),
        "Bot initialized, starting dispatcher"
    );

    let handler = Update::filter_message()
        .filter_map(|msg: Message| InboundText::from_message(&msg))
        .endpoint(message_handler);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![ctx])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Bot stopped");
    Ok(())
}
