use std::sync::Arc;

use teloxide::{
    payloads::SendMessageSetters, prelude::Requester, types::Message, utils::command::BotCommands,
    Bot,
};
use tracing::instrument;

use crate::{keyboard::remove_keyboard, registry::SessionRegistry, replies, HandlerResult};

#[derive(Debug, Clone, BotCommands)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "display help.")]
    Help,
    #[command(description = "start a new quiz.")]
    Start,
    #[command(description = "abandon the current quiz.")]
    Cancel,
}

pub(crate) async fn help(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .await?;
    Ok(())
}

#[instrument(level = "info", skip_all, fields(chat = msg.chat.id.0))]
pub(crate) async fn start(bot: Bot, msg: Message, registry: Arc<SessionRegistry>) -> HandlerResult {
    registry.reset(msg.chat.id).await;
    log::info!("Chat {} started a new quiz", msg.chat.id.0);
    bot.send_message(msg.chat.id, replies::ASK_TOPIC)
        .reply_markup(remove_keyboard())
        .await?;
    Ok(())
}

#[instrument(level = "info", skip_all, fields(chat = msg.chat.id.0))]
pub(crate) async fn cancel(bot: Bot, msg: Message, registry: Arc<SessionRegistry>) -> HandlerResult {
    registry.reset(msg.chat.id).await;
    log::info!("Chat {} cancelled the quiz", msg.chat.id.0);
    bot.send_message(msg.chat.id, replies::CANCELLED)
        .reply_markup(remove_keyboard())
        .await?;
    Ok(())
}
