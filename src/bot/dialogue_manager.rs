//! Dialogue Manager module for the feedback relay flows
//!
//! Each flow runs to completion for one inbound message and leaves the
//! sender's conversation state idle unless it is explicitly waiting for
//! the sender's next message.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::command::Command;
use crate::dialogue::{ParticipantId, Phase};
use crate::relay_errors::RelayError;
use crate::transport::InboundText;

use super::context::AppContext;
use super::ui_builder::{
    format_admin_notification, format_admin_reply, format_welcome, menu_keyboard, MenuContext,
};

/// Send a message to the sender of `event` with the main menu attached
async fn answer_with_menu(ctx: &AppContext, event: &InboundText, text: &str) -> Result<()> {
    ctx.transport
        .show_keyboard(
            event.sender,
            text,
            &menu_keyboard(MenuContext::Main, &ctx.labels),
        )
        .await?;
    Ok(())
}

/// Handle `/start`: reset the sender and show the main menu
pub async fn show_start(ctx: &AppContext, event: &InboundText) -> Result<()> {
    ctx.store.reset(event.sender).await;
    info!(user_id = %event.sender, "User started the bot");
    answer_with_menu(ctx, event, &format_welcome(&ctx.localizer)).await
}

/// Handle the help button: the sender's next message becomes a question
pub async fn show_help(ctx: &AppContext, event: &InboundText) -> Result<()> {
    ctx.store
        .set(event.sender, Phase::AwaitingUserQuestion)
        .await;
    debug!(user_id = %event.sender, "Waiting for a question");

    ctx.transport
        .show_keyboard(
            event.sender,
            &ctx.localizer.t("help-prompt"),
            &menu_keyboard(MenuContext::CancelOnly, &ctx.labels),
        )
        .await?;
    Ok(())
}

/// Handle the cancel button from any state
pub async fn cancel(ctx: &AppContext, event: &InboundText) -> Result<()> {
    ctx.store.reset(event.sender).await;
    debug!(user_id = %event.sender, "Flow cancelled");
    answer_with_menu(ctx, event, &ctx.localizer.t("cancelled")).await
}

/// Relay a user's question to the administrator.
///
/// The notification embeds `/reply_<user id>`; nothing about the pending
/// question is kept on the bot side.
pub async fn forward_to_admin(ctx: &AppContext, event: &InboundText) -> Result<()> {
    let user = event.sender;
    ctx.store.reset(user).await;

    if ctx.is_admin(user) {
        debug!(user_id = %user, "Administrator question not relayed to self");
        return answer_with_menu(ctx, event, &ctx.localizer.t("question-self")).await;
    }

    if !ctx.has_admin() {
        let err = RelayError::Configuration("administrator id is not set".to_string());
        warn!(user_id = %user, error = %err, "Question dropped");
        return answer_with_menu(ctx, event, &err.user_message(&ctx.localizer)).await;
    }

    let notification = format_admin_notification(
        &event.sender_display_name,
        user,
        &event.text,
        &ctx.localizer,
    );

    match ctx.transport.send_text(ctx.admin, &notification, None).await {
        Ok(()) => {
            info!(user_id = %user, "Question forwarded to administrator");
            answer_with_menu(ctx, event, &ctx.localizer.t("question-sent")).await
        }
        Err(cause) => {
            let err = RelayError::Delivery {
                target: ctx.admin,
                cause,
            };
            warn!(user_id = %user, error = %err, "Failed to forward question");
            answer_with_menu(ctx, event, &err.user_message(&ctx.localizer)).await
        }
    }
}

/// A user typed after their question window timed out. Nothing is relayed.
pub async fn question_expired(ctx: &AppContext, event: &InboundText) -> Result<()> {
    let err = RelayError::QuestionExpired;
    info!(user_id = %event.sender, error = %err, "Question not relayed");
    answer_with_menu(ctx, event, &err.user_message(&ctx.localizer)).await
}

/// Handle `/reply_<id>` from the administrator.
///
/// Denied senders and malformed targets leave the state untouched.
pub async fn start_reply(
    ctx: &AppContext,
    event: &InboundText,
    target: Result<ParticipantId, String>,
) -> Result<()> {
    let sender = event.sender;

    if !ctx.is_admin(sender) {
        info!(user_id = %sender, "Reply command denied");
        let err = RelayError::Authorization;
        ctx.transport
            .send_text(sender, &err.user_message(&ctx.localizer), None)
            .await?;
        return Ok(());
    }

    let target = match target {
        Ok(target) => target,
        Err(raw) => {
            let err = RelayError::Validation(raw);
            debug!(user_id = %sender, error = %err, "Malformed reply command");
            ctx.transport
                .send_text(sender, &err.user_message(&ctx.localizer), None)
                .await?;
            return Ok(());
        }
    };

    ctx.store
        .set(sender, Phase::AwaitingAdminReply { target })
        .await;
    info!(user_id = %sender, target = %target, "Administrator is replying");

    let target_id = target.to_string();
    let prompt = ctx
        .localizer
        .t_args("reply-prompt", &[("id", target_id.as_str())]);
    ctx.transport
        .show_keyboard(
            sender,
            &prompt,
            &menu_keyboard(MenuContext::CancelOnly, &ctx.labels),
        )
        .await?;
    Ok(())
}

/// Deliver the administrator's answer to the correlated user.
///
/// The correlation is taken and the state reset before delivery, so no
/// outcome can leave a stale target behind.
pub async fn send_reply(ctx: &AppContext, event: &InboundText) -> Result<()> {
    let admin = event.sender;

    if Command::parse(&event.text, &ctx.labels) == Command::Cancel {
        return cancel(ctx, event).await;
    }

    let mut correlated = None;
    ctx.store
        .update(admin, |state| {
            correlated = state.correlated_participant();
            state.phase = Phase::Idle;
        })
        .await;

    let Some(target) = correlated else {
        let err = RelayError::CorrelationLost;
        warn!(user_id = %admin, error = %err, "Reply has no target");
        return answer_with_menu(ctx, event, &err.user_message(&ctx.localizer)).await;
    };

    let reply = format_admin_reply(&event.text, &ctx.localizer);
    match ctx.transport.send_text(target, &reply, None).await {
        Ok(()) => {
            info!(user_id = %admin, target = %target, "Reply delivered");
            answer_with_menu(ctx, event, &ctx.localizer.t("reply-sent")).await
        }
        Err(cause) => {
            let err = RelayError::Delivery { target, cause };
            warn!(user_id = %admin, target = %target, error = %err, "Reply delivery failed");
            answer_with_menu(ctx, event, &err.user_message(&ctx.localizer)).await
        }
    }
}
