use feedback_relay::bot::Labels;
use feedback_relay::command::Command;
use feedback_relay::dialogue::{ConversationState, ParticipantId, Phase};
use feedback_relay::localization::Localizer;
use feedback_relay::state_store::ConversationStore;

/// Labels of the Russian menu are recognised as commands
#[test]
fn test_localized_labels_parse() {
    let labels = Labels::from_localizer(&Localizer::new("ru"));

    assert_eq!(Command::parse("❓ Помощь", &labels), Command::Help);
    assert_eq!(Command::parse("❌ Отмена", &labels), Command::Cancel);
    assert_eq!(
        Command::parse("❓ Help", &labels),
        Command::FreeText("❓ Help".to_string())
    );
}

/// Reply commands parse the same way in every locale
#[test]
fn test_reply_command_is_locale_independent() {
    for lang in ["en", "ru"] {
        let labels = Labels::from_localizer(&Localizer::new(lang));
        assert_eq!(
            Command::parse("/reply_111", &labels),
            Command::ReplyTo(Ok(ParticipantId(111)))
        );
    }
}

#[test]
fn test_default_phase() {
    assert_eq!(Phase::default(), Phase::Idle);
    let state = ConversationState::idle(chrono::Utc::now());
    assert!(state.is_idle());
    assert_eq!(state.correlated_participant(), None);
}

/// Update runs atomically and sees the current state
#[tokio::test]
async fn test_store_update_returns_new_state() {
    let store = ConversationStore::default();
    let admin = ParticipantId(999);

    let snapshot = store
        .update(admin, |state| {
            state.phase = Phase::AwaitingAdminReply {
                target: ParticipantId(111),
            }
        })
        .await;
    assert_eq!(
        snapshot.state.correlated_participant(),
        Some(ParticipantId(111))
    );
    assert_eq!(snapshot.expired, None);

    let mut taken = None;
    let snapshot = store
        .update(admin, |state| {
            taken = state.correlated_participant();
            state.phase = Phase::Idle;
        })
        .await;
    assert_eq!(taken, Some(ParticipantId(111)));
    assert!(snapshot.state.is_idle());
}

/// Reset keeps the entry; participants are never removed
#[tokio::test]
async fn test_reset_never_removes() {
    let store = ConversationStore::new(None);
    store.set(ParticipantId(1), Phase::AwaitingUserQuestion).await;
    store.reset(ParticipantId(1)).await;

    assert_eq!(store.len().await, 1);
    assert!(store.get(ParticipantId(1)).await.is_idle());
}
