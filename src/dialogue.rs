//! Conversation state for the feedback relay dialogue.

use chrono::{DateTime, Duration, Utc};
use std::fmt;
use teloxide::types::ChatId;

/// A chat party the bot talks to, either an ordinary user or the administrator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticipantId(pub i64);

/// Administrator id used when `ADMIN_ID` is missing or malformed.
/// Nobody is ever recognised as administrator while it is in effect.
pub const UNCONFIGURED_ADMIN: ParticipantId = ParticipantId(0);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ParticipantId> for ChatId {
    fn from(id: ParticipantId) -> Self {
        ChatId(id.0)
    }
}

/// Step of the relay protocol a participant is currently in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    /// The user pressed help and their next text is the question.
    AwaitingUserQuestion,
    /// The administrator issued `/reply_<id>`; their next text goes to `target`.
    AwaitingAdminReply { target: ParticipantId },
}

/// State of one participant's session with the bot
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversationState {
    pub phase: Phase,
    pub touched_at: DateTime<Utc>,
}

impl ConversationState {
    pub fn new(phase: Phase, touched_at: DateTime<Utc>) -> Self {
        Self { phase, touched_at }
    }

    pub fn idle(touched_at: DateTime<Utc>) -> Self {
        Self::new(Phase::Idle, touched_at)
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    /// The user the administrator's next message is routed to, if any.
    pub fn correlated_participant(&self) -> Option<ParticipantId> {
        match self.phase {
            Phase::AwaitingAdminReply { target } => Some(target),
            _ => None,
        }
    }

    /// Whether a non-idle state has outlived `ttl`. Idle states never expire.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Option<Duration>) -> bool {
        match ttl {
            Some(ttl) if !self.is_idle() => now - self.touched_at >= ttl,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_only_when_awaiting_admin_reply() {
        let now = Utc::now();
        assert_eq!(ConversationState::idle(now).correlated_participant(), None);
        assert_eq!(
            ConversationState::new(Phase::AwaitingUserQuestion, now).correlated_participant(),
            None
        );
        let state = ConversationState::new(
            Phase::AwaitingAdminReply {
                target: ParticipantId(111),
            },
            now,
        );
        assert_eq!(state.correlated_participant(), Some(ParticipantId(111)));
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        let old = now - Duration::hours(2);
        let waiting = ConversationState::new(Phase::AwaitingUserQuestion, old);

        assert!(waiting.is_expired(now, Some(Duration::hours(1))));
        assert!(!waiting.is_expired(now, Some(Duration::hours(3))));
        assert!(!waiting.is_expired(now, None));
        assert!(!ConversationState::idle(old).is_expired(now, Some(Duration::seconds(1))));
    }

    #[test]
    fn test_chat_id_conversion() {
        let chat: ChatId = ParticipantId(-42).into();
        assert_eq!(chat, ChatId(-42));
        assert_eq!(ParticipantId(7).to_string(), "7");
    }
}
