//! Inbound Telegram updates mapped onto dialogue events.
//!
//! Only private chats are served. There the chat id equals the user id, which
//! is what replies are addressed to. Group messages are dropped.

use std::sync::Arc;

use conversation::{Conversation, UserInfo};
use teloxide::prelude::*;
use teloxide::types::{Chat, User};
use tracing::{debug, error};

use crate::telegram::TelegramSink;

pub type BotConversation = Arc<Conversation<TelegramSink>>;
pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Split a `/start` command into its optional argument.
///
/// Returns `None` for anything that is not `/start`. Accepts the
/// `/start@BotName` form.
pub fn parse_start(text: &str) -> Option<Option<&str>> {
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let command = parts.next()?;
    let name = command.split('@').next()?;
    if name != "/start" {
        return None;
    }
    Some(parts.next().map(str::trim).filter(|arg| !arg.is_empty()))
}

/// Whether updates from `chat` are handled.
pub fn is_served_chat(chat: &Chat) -> bool {
    chat.is_private()
}

fn user_info(user: &User) -> UserInfo {
    UserInfo {
        user_id: user.id.0 as i64,
        display_name: Some(user.full_name()),
        handle: user.username.clone(),
    }
}

pub async fn on_message(msg: Message, conversation: BotConversation) -> HandlerResult {
    if !is_served_chat(&msg.chat) {
        debug!("Ignoring message from non-private chat {}", msg.chat.id);
        return Ok(());
    }

    let (Some(user), Some(text)) = (msg.from.as_ref(), msg.text()) else {
        return Ok(());
    };

    let result = match parse_start(text) {
        Some(referral) => conversation.handle_begin(&user_info(user), referral).await,
        None => conversation.handle_text(user.id.0 as i64, text).await,
    };

    match result {
        Ok(outcome) => debug!("Message from {}: {:?}", user.id.0, outcome),
        Err(e) => error!("Failed to handle message from {}: {}", user.id.0, e),
    }
    Ok(())
}

pub async fn on_callback(
    bot: Bot,
    query: CallbackQuery,
    conversation: BotConversation,
) -> HandlerResult {
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        error!("Failed to answer callback query: {}", e);
    }

    if let Some(message) = &query.message {
        if !is_served_chat(message.chat()) {
            debug!("Ignoring callback from non-private chat {}", message.chat().id);
            return Ok(());
        }
    }

    let Some(data) = query.data.as_deref() else {
        return Ok(());
    };

    let user_id = query.from.id.0 as i64;
    match conversation.handle_choice(user_id, data).await {
        Ok(outcome) => debug!("Choice {:?} from {}: {:?}", data, user_id, outcome),
        Err(e) => error!("Failed to handle choice from {}: {}", user_id, e),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_start() {
        assert_eq!(parse_start("/start"), Some(None));
        assert_eq!(parse_start("/start REF42"), Some(Some("REF42")));
        assert_eq!(parse_start("/start@SlaydBot REF42"), Some(Some("REF42")));
        assert_eq!(parse_start("  /start   "), Some(None));
        assert_eq!(parse_start("/help"), None);
        assert_eq!(parse_start("/starting"), None);
        assert_eq!(parse_start("start"), None);
    }

    fn chat(json: serde_json::Value) -> Chat {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_only_private_chats_are_served() {
        let private = chat(serde_json::json!({
            "id": 42,
            "type": "private",
            "first_name": "Ali"
        }));
        assert!(is_served_chat(&private));

        let group = chat(serde_json::json!({
            "id": -100,
            "type": "group",
            "title": "Sinf"
        }));
        assert!(!is_served_chat(&group));

        let supergroup = chat(serde_json::json!({
            "id": -1001,
            "type": "supergroup",
            "title": "Maktab"
        }));
        assert!(!is_served_chat(&supergroup));
    }
}
