//! Transport abstraction for sending relay messages.
//!
//! [`Transport`] is platform-agnostic; [`TelegramTransport`] implements it via teloxide.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup};
use teloxide::{ApiError, RequestError};

use crate::dialogue::ParticipantId;
use crate::relay_errors::TransportError;

/// Reply keyboard shown under the message input
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<String>>,
    pub resize: bool,
}

/// Inbound text event as seen by the relay
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundText {
    pub sender: ParticipantId,
    pub sender_display_name: String,
    pub text: String,
}

impl InboundText {
    pub fn new(sender: ParticipantId, sender_display_name: &str, text: &str) -> Self {
        Self {
            sender,
            sender_display_name: sender_display_name.to_string(),
            text: text.to_string(),
        }
    }

    /// Extract a text event from a Telegram message. Messages without text
    /// or without a sender are not part of the relay.
    pub fn from_message(msg: &Message) -> Option<Self> {
        let text = msg.text()?;
        let user = msg.from.as_ref()?;
        let sender = ParticipantId(i64::try_from(user.id.0).ok()?);

        let full_name = user.full_name();
        let sender_display_name = if !full_name.trim().is_empty() {
            full_name
        } else if let Some(username) = &user.username {
            format!("@{username}")
        } else {
            sender.to_string()
        };

        Some(Self {
            sender,
            sender_display_name,
            text: text.to_string(),
        })
    }
}

/// Outbound side of the bot. Implementations map to a messaging platform.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a text message, optionally replacing the reply keyboard.
    async fn send_text(
        &self,
        target: ParticipantId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TransportError>;

    /// Show a keyboard. Telegram only attaches keyboards to messages, so a prompt is required.
    async fn show_keyboard(
        &self,
        target: ParticipantId,
        prompt: &str,
        keyboard: &Keyboard,
    ) -> Result<(), TransportError> {
        self.send_text(target, prompt, Some(keyboard)).await
    }
}

/// Teloxide-based implementation of [`Transport`].
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

fn to_keyboard_markup(keyboard: &Keyboard) -> KeyboardMarkup {
    let rows = keyboard
        .rows
        .iter()
        .map(|row| row.iter().map(KeyboardButton::new).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    let markup = KeyboardMarkup::new(rows);
    if keyboard.resize {
        markup.resize_keyboard()
    } else {
        markup
    }
}

/// Chats that can no longer receive anything from the bot are reported as
/// unreachable; every other failure keeps the API's description.
fn to_transport_error(target: ParticipantId, error: RequestError) -> TransportError {
    match error {
        RequestError::Api(
            ApiError::BotBlocked | ApiError::ChatNotFound | ApiError::UserDeactivated,
        ) => TransportError::Unreachable(target),
        other => TransportError::Request(other.to_string()),
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send_text(
        &self,
        target: ParticipantId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TransportError> {
        let request = self.bot.send_message(ChatId::from(target), text);
        let result = match keyboard {
            Some(keyboard) => request.reply_markup(to_keyboard_markup(keyboard)).await,
            None => request.await,
        };

        result
            .map(|_| ())
            .map_err(|e| to_transport_error(target, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_conversion() {
        let keyboard = Keyboard {
            rows: vec![
                vec!["📅 Request vacation".to_string()],
                vec!["📊 My vacations".to_string(), "❓ Help".to_string()],
            ],
            resize: true,
        };

        let markup = to_keyboard_markup(&keyboard);
        assert_eq!(markup.keyboard.len(), 2);
        assert_eq!(markup.keyboard[1].len(), 2);
        assert_eq!(markup.keyboard[1][1].text, "❓ Help");
    }

    #[test]
    fn test_blocked_chat_is_unreachable() {
        let target = ParticipantId(111);

        for api_error in [
            ApiError::BotBlocked,
            ApiError::ChatNotFound,
            ApiError::UserDeactivated,
        ] {
            assert_eq!(
                to_transport_error(target, RequestError::Api(api_error)),
                TransportError::Unreachable(target)
            );
        }
    }

    #[test]
    fn test_other_api_errors_keep_description() {
        let error = to_transport_error(
            ParticipantId(111),
            RequestError::Api(ApiError::MessageTextIsEmpty),
        );
        assert!(matches!(error, TransportError::Request(_)));
    }
}
