//! Recording implementation of [`Transport`] for integration tests.
//!
//! Keeps every send so tests can assert on who received what without
//! hitting Telegram. Targets marked with `fail_for` reject delivery.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

use feedback_relay::bot::{message_handler, AppContext};
use feedback_relay::dialogue::ParticipantId;
use feedback_relay::localization::Localizer;
use feedback_relay::relay_errors::TransportError;
use feedback_relay::state_store::ConversationStore;
use feedback_relay::transport::{InboundText, Keyboard, Transport};

pub const ADMIN: ParticipantId = ParticipantId(999);
pub const ALICE: ParticipantId = ParticipantId(111);
pub const BOB: ParticipantId = ParticipantId(222);

pub const BLOCKED_CAUSE: &str = "Forbidden: bot was blocked by the user";

/// One recorded call to `send_text`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub target: ParticipantId,
    pub text: String,
    pub keyboard: Option<Keyboard>,
    pub delivered: bool,
}

#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Sent>>,
    failing: Mutex<HashSet<ParticipantId>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every send to `target` fail as if the user blocked the bot
    pub async fn fail_for(&self, target: ParticipantId) {
        self.failing.lock().await.insert(target);
    }

    /// Messages actually delivered to `target`
    pub async fn delivered_to(&self, target: ParticipantId) -> Vec<Sent> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|sent| sent.target == target && sent.delivered)
            .cloned()
            .collect()
    }

    /// Text of the last message delivered to `target`
    pub async fn last_text_to(&self, target: ParticipantId) -> Option<String> {
        self.delivered_to(target)
            .await
            .last()
            .map(|sent| sent.text.clone())
    }

    pub async fn attempts(&self) -> Vec<Sent> {
        self.sent.lock().await.clone()
    }

    pub async fn clear(&self) {
        self.sent.lock().await.clear();
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_text(
        &self,
        target: ParticipantId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TransportError> {
        let delivered = !self.failing.lock().await.contains(&target);
        self.sent.lock().await.push(Sent {
            target,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
            delivered,
        });

        if delivered {
            Ok(())
        } else {
            Err(TransportError::Request(BLOCKED_CAUSE.to_string()))
        }
    }
}

pub fn context_with(
    transport: Arc<RecordingTransport>,
    admin: ParticipantId,
    store: ConversationStore,
) -> Arc<AppContext> {
    Arc::new(AppContext::new(
        transport as Arc<dyn Transport>,
        store,
        admin,
        Localizer::new("en"),
    ))
}

/// English context with [`ADMIN`] as administrator
pub fn setup() -> (Arc<AppContext>, Arc<RecordingTransport>) {
    let transport = RecordingTransport::new();
    let ctx = context_with(transport.clone(), ADMIN, ConversationStore::default());
    (ctx, transport)
}

pub fn display_name(id: ParticipantId) -> &'static str {
    match id {
        ALICE => "Alice",
        BOB => "Bob",
        ADMIN => "Admin",
        _ => "Someone",
    }
}

/// Feed one text message through the dispatcher
pub async fn send(ctx: &Arc<AppContext>, from: ParticipantId, text: &str) {
    message_handler(ctx.clone(), InboundText::new(from, display_name(from), text))
        .await
        .expect("handler should not fail");
}
