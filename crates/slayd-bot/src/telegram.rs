//! Telegram reply sink.

use async_trait::async_trait;
use conversation::{Choice, ConversationError, ReplySink};
use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile};

/// Sends replies through the Telegram Bot API.
///
/// Recipients are user ids, used as the id of the user's private chat.
#[derive(Clone)]
pub struct TelegramSink {
    bot: Bot,
}

impl TelegramSink {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

fn keyboard(rows: &[Vec<Choice>]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(rows.iter().map(|row| {
        row.iter()
            .map(|choice| {
                InlineKeyboardButton::callback(choice.label.clone(), choice.payload.clone())
            })
            .collect::<Vec<_>>()
    }))
}

#[async_trait]
impl ReplySink for TelegramSink {
    async fn send_text(&self, recipient: i64, text: &str) -> Result<(), ConversationError> {
        self.bot
            .send_message(ChatId(recipient), text)
            .await
            .map_err(|e| ConversationError::SendFailed(e.to_string()))?;
        Ok(())
    }

    async fn send_choices(
        &self,
        recipient: i64,
        text: &str,
        rows: &[Vec<Choice>],
    ) -> Result<(), ConversationError> {
        self.bot
            .send_message(ChatId(recipient), text)
            .reply_markup(keyboard(rows))
            .await
            .map_err(|e| ConversationError::SendFailed(e.to_string()))?;
        Ok(())
    }

    async fn send_document(
        &self,
        recipient: i64,
        file_name: &str,
        bytes: Vec<u8>,
        caption: &str,
    ) -> Result<(), ConversationError> {
        let file = InputFile::memory(bytes).file_name(file_name.to_string());
        self.bot
            .send_document(ChatId(recipient), file)
            .caption(caption)
            .await
            .map_err(|e| ConversationError::SendFailed(e.to_string()))?;
        Ok(())
    }
}
