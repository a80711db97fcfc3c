//! Parsing of inbound text into typed commands.

use regex::Regex;
use std::sync::LazyLock;

use crate::bot::ui_builder::Labels;
use crate::dialogue::ParticipantId;

static REPLY_COMMAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^/reply(?:_(?P<target>[^@\s]*))?(?:@\w+)?(?:\s.*)?$")
        .expect("reply command pattern is valid")
});

/// What an inbound text means, independent of who sent it
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Cancel,
    /// `/reply_<id>`. `Err` carries the malformed target text.
    ReplyTo(Result<ParticipantId, String>),
    FreeText(String),
    /// A slash command the bot does not know
    Unrecognized(String),
}

impl Command {
    pub fn parse(text: &str, labels: &Labels) -> Self {
        if text == labels.help {
            return Command::Help;
        }
        if text == labels.cancel {
            return Command::Cancel;
        }

        if !text.starts_with('/') {
            return Command::FreeText(text.to_string());
        }

        if let Some(captures) = REPLY_COMMAND.captures(text) {
            let target = captures.name("target").map_or("", |m| m.as_str());
            return Command::ReplyTo(parse_participant_id(target));
        }

        match command_name(text) {
            "/start" => Command::Start,
            "/help" => Command::Help,
            "/cancel" => Command::Cancel,
            _ => Command::Unrecognized(text.to_string()),
        }
    }
}

/// First word of a slash command without any `@botname` suffix
fn command_name(text: &str) -> &str {
    let word = text.split_whitespace().next().unwrap_or("");
    word.split('@').next().unwrap_or(word)
}

fn parse_participant_id(raw: &str) -> Result<ParticipantId, String> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(raw.to_string());
    }
    raw.parse().map(ParticipantId).map_err(|_| raw.to_string())
}
