//! Telegram bot handlers.

use crate::command::{main_menu, Action, Command};
use crate::processor::{CommandProcessor, Reply};
use crate::relay::{AlertSink, RelayError};
use async_trait::async_trait;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::command::BotCommands;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("Telegram API error: {0}")]
    Api(#[from] teloxide::RequestError),
}

/// Telegram bot wrapper.
pub struct TelegramBot {
    bot: Bot,
    processor: Arc<CommandProcessor>,
}

impl TelegramBot {
    /// Create a new bot with the given token.
    pub fn new(token: &str, processor: Arc<CommandProcessor>) -> Self {
        let bot = Bot::new(token);
        Self { bot, processor }
    }

    /// Get the underlying bot for sending messages.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    /// Run the command and button handlers until Ctrl+C.
    pub async fn run(self: Arc<Self>) {
        if let Err(e) = self.bot.set_my_commands(Command::bot_commands()).await {
            warn!(error = %e, "Failed to publish bot command list");
        }

        let bot = self.bot.clone();
        let commands = Arc::clone(&self);
        let callbacks = Arc::clone(&self);

        let handler = dptree::entry()
            .branch(Update::filter_message().filter_command::<Command>().endpoint(
                move |bot: Bot, msg: Message, cmd: Command| {
                    let this = Arc::clone(&commands);
                    async move { this.handle_command(bot, msg, cmd).await }
                },
            ))
            .branch(Update::filter_callback_query().endpoint(
                move |bot: Bot, q: CallbackQuery| {
                    let this = Arc::clone(&callbacks);
                    async move { this.handle_callback(bot, q).await }
                },
            ));

        info!("Telegram bot polling for updates");
        Dispatcher::builder(bot, handler)
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }

    async fn handle_command(&self, bot: Bot, msg: Message, cmd: Command) -> Result<(), TelegramError> {
        debug!(chat_id = %msg.chat.id, command = ?cmd, "Command received");
        self.perform(&bot, msg.chat.id, Action::from_command(cmd)).await
    }

    async fn handle_callback(&self, bot: Bot, q: CallbackQuery) -> Result<(), TelegramError> {
        bot.answer_callback_query(q.id.clone()).await?;

        let chat_id = q
            .message
            .as_ref()
            .map(|m| m.chat().id)
            .unwrap_or_else(|| ChatId::from(q.from.id));

        match q.data.as_deref().and_then(Action::from_callback) {
            Some(action) => self.perform(&bot, chat_id, action).await,
            None => {
                debug!(data = ?q.data, "Ignoring unknown button");
                Ok(())
            }
        }
    }

    async fn perform(&self, bot: &Bot, chat_id: ChatId, action: Action) -> Result<(), TelegramError> {
        if let Some(notice) = self.processor.progress_notice(&action) {
            bot.send_message(chat_id, notice)
                .parse_mode(ParseMode::Html)
                .await?;
        }

        let reply = self.processor.execute(&action).await;
        send_reply(bot, chat_id, reply).await
    }
}

async fn send_reply(bot: &Bot, chat_id: ChatId, reply: Reply) -> Result<(), TelegramError> {
    let request = bot
        .send_message(chat_id, reply.text)
        .parse_mode(ParseMode::Html);

    if reply.with_menu {
        request.reply_markup(main_menu()).await?;
    } else {
        request.await?;
    }
    Ok(())
}

/// Sends relay alerts to one fixed chat.
#[derive(Clone)]
pub struct TelegramSink {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramSink {
    pub fn new(bot: Bot, chat_id: i64) -> Self {
        Self {
            bot,
            chat_id: ChatId(chat_id),
        }
    }
}

#[async_trait]
impl AlertSink for TelegramSink {
    async fn send_alert(&self, message: &str) -> Result<(), RelayError> {
        self.bot
            .send_message(self.chat_id, message)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }
}
