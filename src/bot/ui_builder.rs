//! UI Builder module for creating keyboards and formatting messages

use crate::dialogue::ParticipantId;
use crate::localization::Localizer;
use crate::transport::Keyboard;

/// Reply keyboard labels in the active language
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Labels {
    pub vacation_request: String,
    pub my_vacations: String,
    pub help: String,
    pub cancel: String,
}

impl Labels {
    pub fn from_localizer(localizer: &Localizer) -> Self {
        Self {
            vacation_request: localizer.t("menu-vacation-request"),
            my_vacations: localizer.t("menu-my-vacations"),
            help: localizer.t("menu-help"),
            cancel: localizer.t("menu-cancel"),
        }
    }
}

/// Which keyboard to show
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuContext {
    Main,
    CancelOnly,
}

/// Build the reply keyboard for a context
pub fn menu_keyboard(context: MenuContext, labels: &Labels) -> Keyboard {
    let rows = match context {
        MenuContext::Main => vec![
            vec![labels.vacation_request.clone()],
            vec![labels.my_vacations.clone(), labels.help.clone()],
        ],
        MenuContext::CancelOnly => vec![vec![labels.cancel.clone()]],
    };

    Keyboard { rows, resize: true }
}

pub fn format_welcome(localizer: &Localizer) -> String {
    format!(
        "{}\n{}",
        localizer.t("welcome-title"),
        localizer.t("welcome-description")
    )
}

/// Question notification for the administrator. Carries the `/reply_<id>`
/// token, which is the only record of who asked.
pub fn format_admin_notification(
    display_name: &str,
    sender: ParticipantId,
    question: &str,
    localizer: &Localizer,
) -> String {
    let id = sender.to_string();
    format!(
        "{}\n{}\n\n{}\n\n{}",
        localizer.t("admin-notification-title"),
        localizer.t_args(
            "admin-notification-from",
            &[("name", display_name), ("id", id.as_str())]
        ),
        localizer.t_args("admin-notification-text", &[("question", question)]),
        localizer.t_args("admin-notification-hint", &[("id", id.as_str())])
    )
}

/// Administrator answer as delivered to the user
pub fn format_admin_reply(text: &str, localizer: &Localizer) -> String {
    format!("{}\n\n{}", localizer.t("reply-header"), text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_menu_layout() {
        let labels = Labels::from_localizer(&Localizer::new("ru"));
        let keyboard = menu_keyboard(MenuContext::Main, &labels);

        assert_eq!(
            keyboard.rows,
            vec![
                vec!["📅 Подать заявку на отпуск".to_string()],
                vec!["📊 Мои отпуска".to_string(), "❓ Помощь".to_string()],
            ]
        );
        assert!(keyboard.resize);
    }

    #[test]
    fn test_cancel_only_layout() {
        let labels = Labels::from_localizer(&Localizer::new("en"));
        let keyboard = menu_keyboard(MenuContext::CancelOnly, &labels);
        assert_eq!(keyboard.rows, vec![vec!["❌ Cancel".to_string()]]);
    }

    #[test]
    fn test_menu_is_deterministic() {
        let labels = Labels::from_localizer(&Localizer::new("en"));
        assert_eq!(
            menu_keyboard(MenuContext::Main, &labels),
            menu_keyboard(MenuContext::Main, &labels)
        );
    }

    #[test]
    fn test_admin_notification_embeds_reply_token() {
        let localizer = Localizer::new("en");
        let text =
            format_admin_notification("Alice", ParticipantId(111), "When is payroll?", &localizer);

        assert!(text.contains("Alice"));
        assert!(text.contains("111"));
        assert!(text.contains("When is payroll?"));
        assert!(text.contains("/reply_111"));
    }
}
