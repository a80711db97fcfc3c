//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `context`: Shared application context injected into handlers
//! - `message_handler`: Routes incoming text messages to a relay flow
//! - `dialogue_manager`: The relay flows and their state transitions
//! - `ui_builder`: Creates keyboards and formats messages

pub mod context;
pub mod dialogue_manager;
pub mod message_handler;
pub mod ui_builder;

pub use context::AppContext;
pub use message_handler::{message_handler, route, Route};
pub use ui_builder::{menu_keyboard, Labels, MenuContext};
