//! Message Handler module: routes each inbound text to exactly one relay flow

use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

use crate::command::Command;
use crate::dialogue::{ParticipantId, Phase};
use crate::state_store::Snapshot;
use crate::transport::InboundText;

use super::context::AppContext;
use super::dialogue_manager::{
    cancel, forward_to_admin, question_expired, send_reply, show_help, show_start, start_reply,
};

/// Flow selected for an inbound message
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Start,
    Help,
    Cancel,
    ForwardToAdmin,
    QuestionExpired,
    StartReply(Result<ParticipantId, String>),
    SendReply,
    Ignore,
}

/// Pick the flow for a message. First matching rule wins:
///
/// 1. `/start`
/// 2. help label while idle
/// 3. cancel label
/// 4. any text while a question is awaited, or just timed out
/// 5. `/reply_<id>` (authorization is checked by the flow)
/// 6. any text from the administrator while a reply is awaited, or just
///    timed out (the reply flow then reports the lost target)
/// 7. everything else is ignored
pub fn route(command: &Command, snapshot: &Snapshot, sender_is_admin: bool) -> Route {
    let state = &snapshot.state;

    match command {
        Command::Start => return Route::Start,
        Command::Help if state.is_idle() => return Route::Help,
        Command::Cancel => return Route::Cancel,
        _ => {}
    }

    if state.phase == Phase::AwaitingUserQuestion {
        return Route::ForwardToAdmin;
    }
    if snapshot.expired == Some(Phase::AwaitingUserQuestion) {
        return Route::QuestionExpired;
    }

    if let Command::ReplyTo(target) = command {
        return Route::StartReply(target.clone());
    }

    let awaiting_reply = matches!(state.phase, Phase::AwaitingAdminReply { .. })
        || matches!(snapshot.expired, Some(Phase::AwaitingAdminReply { .. }));
    if sender_is_admin && awaiting_reply {
        return Route::SendReply;
    }

    Route::Ignore
}

pub async fn message_handler(ctx: Arc<AppContext>, event: InboundText) -> Result<()> {
    let command = Command::parse(&event.text, &ctx.labels);
    let snapshot = ctx.store.snapshot(event.sender).await;
    let route = route(&command, &snapshot, ctx.is_admin(event.sender));

    debug!(
        user_id = %event.sender,
        phase = ?snapshot.state.phase,
        expired = ?snapshot.expired,
        route = ?route,
        message_length = event.text.len(),
        "Routing text message"
    );

    match route {
        Route::Start => show_start(&ctx, &event).await,
        Route::Help => show_help(&ctx, &event).await,
        Route::Cancel => cancel(&ctx, &event).await,
        Route::ForwardToAdmin => forward_to_admin(&ctx, &event).await,
        Route::QuestionExpired => question_expired(&ctx, &event).await,
        Route::StartReply(target) => start_reply(&ctx, &event, target).await,
        Route::SendReply => send_reply(&ctx, &event).await,
        Route::Ignore => {
            debug!(user_id = %event.sender, "Ignoring text outside any flow");
            Ok(())
        }
    }
}
