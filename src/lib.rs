//! # Feedback Relay Telegram Bot
//!
//! A Telegram bot that shows a small menu and relays user questions to a
//! single administrator, routing the administrator's answers back to the
//! user who asked.

pub mod bot;
pub mod command;
pub mod config;
pub mod dialogue;
pub mod localization;
pub mod logging;
pub mod relay_errors;
pub mod state_store;
pub mod transport;
