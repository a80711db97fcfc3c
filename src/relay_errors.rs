//! # Relay Error Types Module
//!
//! Recoverable failures of the relay flows and of the outbound transport.
//! None of these are fatal; each is rendered as a visible message to the
//! party that triggered it.

use thiserror::Error;

use crate::dialogue::ParticipantId;
use crate::localization::Localizer;

/// Failure of a single outbound send
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("chat {0} is unreachable")]
    Unreachable(ParticipantId),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// Administrator id missing or malformed at startup
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Administrator-only command from someone else
    #[error("access denied")]
    Authorization,

    /// Malformed `/reply_<id>` target
    #[error("invalid reply target: {0:?}")]
    Validation(String),

    /// Administrator is awaiting a reply but no target is recorded
    #[error("reply target lost")]
    CorrelationLost,

    /// User wrote after the question window timed out
    #[error("question window expired")]
    QuestionExpired,

    #[error("delivery to {target} failed: {cause}")]
    Delivery {
        target: ParticipantId,
        cause: TransportError,
    },
}

impl RelayError {
    /// Text shown to the party whose action failed
    pub fn user_message(&self, localizer: &Localizer) -> String {
        match self {
            RelayError::Configuration(_) => localizer.t("error-admin-unconfigured"),
            RelayError::Authorization => localizer.t("error-access-denied"),
            RelayError::Validation(_) => localizer.t("error-reply-format"),
            RelayError::CorrelationLost => localizer.t("error-correlation-lost"),
            RelayError::QuestionExpired => localizer.t("error-question-expired"),
            RelayError::Delivery { cause, .. } => {
                let cause = cause.to_string();
                localizer.t_args("error-delivery", &[("cause", cause.as_str())])
            }
        }
    }
}
