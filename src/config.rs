//! # Bot Configuration Module
//!
//! Loads the relay bot settings from environment variables
//! (after `.env` has been applied by `main`).

use chrono::Duration;
use std::env;
use thiserror::Error;
use tracing::{error, warn};

use crate::dialogue::{ParticipantId, UNCONFIGURED_ADMIN};
use crate::state_store::DEFAULT_STATE_TTL_SECS;

/// Language of the original bot audience
pub const DEFAULT_LOCALE: &str = "ru";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("BOT_TOKEN (or TELEGRAM_BOT_TOKEN) must be set")]
    MissingToken,
}

/// Relay bot configuration
#[derive(Clone)]
pub struct Config {
    /// Telegram bot token
    pub bot_token: String,
    /// Administrator receiving questions; `0` when unset, which denies every admin action
    pub admin_id: ParticipantId,
    /// Language of all bot texts and button labels
    pub locale: String,
    /// Lifetime of a pending question or reply, `None` for no expiry
    pub state_ttl: Option<Duration>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"<redacted>")
            .field("admin_id", &self.admin_id)
            .field("locale", &self.locale)
            .field("state_ttl", &self.state_ttl)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    ///
    /// Only a missing token is fatal. A bad `ADMIN_ID` leaves the bot running
    /// with no administrator.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = lookup("BOT_TOKEN")
            .or_else(|| lookup("TELEGRAM_BOT_TOKEN"))
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let admin_id = match lookup("ADMIN_ID").map(|raw| raw.trim().parse::<i64>()) {
            Some(Ok(id)) => ParticipantId(id),
            Some(Err(e)) => {
                error!(error = %e, "ADMIN_ID is not a number, administrator commands are disabled");
                UNCONFIGURED_ADMIN
            }
            None => {
                error!("ADMIN_ID is not set, administrator commands are disabled");
                UNCONFIGURED_ADMIN
            }
        };

        let locale = lookup("BOT_LOCALE")
            .map(|raw| raw.trim().to_lowercase())
            .filter(|raw| !raw.is_empty())
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string());

        let state_ttl_secs = match lookup("STATE_TTL_SECS").map(|raw| raw.trim().parse::<i64>()) {
            Some(Ok(secs)) if secs >= 0 => secs,
            Some(_) => {
                warn!(default = DEFAULT_STATE_TTL_SECS, "STATE_TTL_SECS is invalid, using default");
                DEFAULT_STATE_TTL_SECS
            }
            None => DEFAULT_STATE_TTL_SECS,
        };
        let state_ttl = (state_ttl_secs > 0).then(|| Duration::seconds(state_ttl_secs));

        Ok(Self {
            bot_token,
            admin_id,
            locale,
            state_ttl,
        })
    }
}
