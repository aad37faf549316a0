//! Blocking modal dialogs: notice, confirm, and prompt.
//!
//! While a dialog is up it consumes all keyboard input, which is the
//! terminal equivalent of the original blocking alert/confirm/prompt
//! calls.

use crossterm::event::{KeyCode, KeyEvent};
use natter_core::conversation::ConversationId;

/// Action armed behind a yes/no confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteConversation(ConversationId),
}

/// Action fed by a submitted prompt value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAction {
    RenameConversation(ConversationId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Notice {
        message: String,
    },
    Confirm {
        message: String,
        action: ConfirmAction,
    },
    Prompt {
        title: String,
        value: String,
        action: PromptAction,
    },
}

/// What a closed dialog resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    Dismissed,
    Confirmed(ConfirmAction),
    Submitted { action: PromptAction, value: String },
}

impl Dialog {
    pub fn notice(message: impl Into<String>) -> Self {
        Self::Notice {
            message: message.into(),
        }
    }

    pub fn confirm(message: impl Into<String>, action: ConfirmAction) -> Self {
        Self::Confirm {
            message: message.into(),
            action,
        }
    }

    /// A prompt pre-filled with `value`, as the rename flow requires.
    pub fn prompt(title: impl Into<String>, value: impl Into<String>, action: PromptAction) -> Self {
        Self::Prompt {
            title: title.into(),
            value: value.into(),
            action,
        }
    }

    /// Feeds one key press to the dialog. `Some` means the dialog is done
    /// and should be closed with the given outcome.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<DialogOutcome> {
        match self {
            Dialog::Notice { .. } => match key.code {
                KeyCode::Enter | KeyCode::Esc => Some(DialogOutcome::Dismissed),
                _ => None,
            },
            Dialog::Confirm { action, .. } => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    Some(DialogOutcome::Confirmed(action.clone()))
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    Some(DialogOutcome::Dismissed)
                }
                _ => None,
            },
            Dialog::Prompt { value, action, .. } => match key.code {
                KeyCode::Esc => Some(DialogOutcome::Dismissed),
                KeyCode::Enter => Some(DialogOutcome::Submitted {
                    action: action.clone(),
                    value: value.clone(),
                }),
                KeyCode::Backspace => {
                    value.pop();
                    None
                }
                KeyCode::Char(c) => {
                    value.push(c);
                    None
                }
                _ => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn rename_action() -> PromptAction {
        PromptAction::RenameConversation(ConversationId::from("1"))
    }

    #[test]
    fn notice_dismisses_on_enter_and_escape() {
        let mut dialog = Dialog::notice("oops");
        assert_eq!(
            dialog.handle_key(press(KeyCode::Enter)),
            Some(DialogOutcome::Dismissed)
        );
        let mut dialog = Dialog::notice("oops");
        assert_eq!(
            dialog.handle_key(press(KeyCode::Esc)),
            Some(DialogOutcome::Dismissed)
        );
    }

    #[test]
    fn notice_swallows_other_keys() {
        let mut dialog = Dialog::notice("oops");
        assert_eq!(dialog.handle_key(press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn confirm_yes_carries_the_action() {
        let action = ConfirmAction::DeleteConversation(ConversationId::from("5"));
        let mut dialog = Dialog::confirm("sure?", action.clone());
        assert_eq!(
            dialog.handle_key(press(KeyCode::Char('y'))),
            Some(DialogOutcome::Confirmed(action))
        );
    }

    #[test]
    fn confirm_no_dismisses() {
        let action = ConfirmAction::DeleteConversation(ConversationId::from("5"));
        let mut dialog = Dialog::confirm("sure?", action);
        assert_eq!(
            dialog.handle_key(press(KeyCode::Char('n'))),
            Some(DialogOutcome::Dismissed)
        );
    }

    #[test]
    fn prompt_edits_prefilled_value() {
        let mut dialog = Dialog::prompt("New title", "Jan 5", rename_action());
        dialog.handle_key(press(KeyCode::Backspace));
        dialog.handle_key(press(KeyCode::Char('6')));
        let outcome = dialog.handle_key(press(KeyCode::Enter));
        assert_eq!(
            outcome,
            Some(DialogOutcome::Submitted {
                action: rename_action(),
                value: "Jan 6".to_string()
            })
        );
    }

    #[test]
    fn prompt_escape_discards_edits() {
        let mut dialog = Dialog::prompt("New title", "Jan 5", rename_action());
        dialog.handle_key(press(KeyCode::Char('x')));
        assert_eq!(
            dialog.handle_key(press(KeyCode::Esc)),
            Some(DialogOutcome::Dismissed)
        );
    }
}
