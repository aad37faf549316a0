//! Application state and the chat session controller.
//!
//! All state transitions live here and are pure with respect to IO: input
//! events come in, [`Command`]s describing network or platform work come
//! out, and the runtime in `main` executes them. That keeps every
//! controller rule testable without a terminal or a server.

use crate::dialog::{ConfirmAction, Dialog, DialogOutcome, PromptAction};
use crate::event::{AppEvent, StoreEvent};
use crate::markdown;
use crate::sidebar::{Sidebar, SidebarHit, hit_test};
use crate::ui;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use natter_client::ChatEvent;
use natter_core::config::AppConfig;
use natter_core::conversation::{
    ConversationId, ConversationSummary, Message, title_for_new_conversation,
};
use tracing::{debug, error, info};

/// Ticks the "copied" flash stays visible (200ms ticks, ~2s).
const COPY_FLASH_TICKS: u8 = 10;

/// Side effects requested by the controller, executed by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateConversation { title: String },
    ListConversations,
    LoadConversation { id: ConversationId },
    RenameConversation { id: ConversationId, title: String },
    DeleteConversation { id: ConversationId },
    SendChat { id: ConversationId, message: String },
    CopyToClipboard { text: String },
    PreviewConversation { title: String, messages: Vec<Message> },
}

/// Progress of the outgoing message, per the send state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendPhase {
    Idle,
    /// Request issued, response not yet open; typing indicator shows.
    Sending,
    /// Response open, chunks arriving.
    Streaming,
}

pub struct App {
    pub config: AppConfig,
    pub conversations: Vec<ConversationSummary>,
    /// The single nullable active-conversation identifier.
    pub active_id: Option<ConversationId>,
    pub messages: Vec<Message>,
    /// Accumulated assistant text while a response streams.
    pub pending_assistant: String,
    pub phase: SendPhase,
    pub input: String,
    pub header_title: String,
    pub sidebar: Sidebar,
    pub dialog: Option<Dialog>,
    pub scroll: u16,
    pub stick_to_bottom: bool,
    /// Last drawn frame size, for mouse hit-testing.
    pub viewport: ratatui::layout::Rect,
    pub chat_height: u16,
    pub copied_flash: u8,
    pub tick: u64,
    pub quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let header_title = format!("Welcome, {}", config.display_name);
        Self {
            config,
            conversations: Vec::new(),
            active_id: None,
            messages: Vec::new(),
            pending_assistant: String::new(),
            phase: SendPhase::Idle,
            input: String::new(),
            header_title,
            sidebar: Sidebar::new(),
            dialog: None,
            scroll: 0,
            stick_to_bottom: true,
            viewport: ratatui::layout::Rect::default(),
            chat_height: 0,
            copied_flash: 0,
            tick: 0,
            quit: false,
        }
    }

    /// Default header greeting, restored when the active conversation
    /// goes away.
    pub fn greeting(&self) -> String {
        format!("Welcome, {}", self.config.display_name)
    }

    /// Commands to run at startup: fetch the sidebar list, then either
    /// load the first conversation or create one (see `on_store_event`).
    pub fn startup(&self) -> Vec<Command> {
        vec![Command::ListConversations]
    }

    /// Whether the chat pane should show the empty-conversation
    /// placeholder.
    pub fn shows_empty_state(&self) -> bool {
        self.active_id.is_some()
            && self.messages.is_empty()
            && self.pending_assistant.is_empty()
            && self.phase == SendPhase::Idle
    }

    pub fn title_of(&self, id: &ConversationId) -> Option<&str> {
        self.conversations
            .iter()
            .find(|c| &c.id == id)
            .map(|c| c.title.as_str())
    }

    fn notice(&mut self, message: impl Into<String>) {
        self.dialog = Some(Dialog::notice(message));
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Vec<Command> {
        match event {
            AppEvent::Tick => {
                self.tick = self.tick.wrapping_add(1);
                self.copied_flash = self.copied_flash.saturating_sub(1);
                Vec::new()
            }
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Mouse(mouse) => self.handle_mouse(mouse),
            AppEvent::Chat(event) => self.on_chat_event(event),
            AppEvent::Store(event) => self.on_store_event(event),
            AppEvent::Failure(message) => {
                self.notice(message);
                Vec::new()
            }
        }
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Command> {
        // a dialog is blocking: it consumes everything
        if let Some(mut dialog) = self.dialog.take() {
            return match dialog.handle_key(key) {
                Some(outcome) => self.apply_dialog_outcome(outcome),
                None => {
                    self.dialog = Some(dialog);
                    Vec::new()
                }
            };
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => {
                    self.quit = true;
                    Vec::new()
                }
                KeyCode::Char('n') => self.request_new_conversation(),
                KeyCode::Char('b') => {
                    self.sidebar.toggle();
                    Vec::new()
                }
                KeyCode::Char('r') => self.request_rename_active(),
                KeyCode::Char('d') => self.request_delete_active(),
                KeyCode::Char('y') => self.copy_last_message(),
                KeyCode::Char('o') => self.preview_conversation(),
                _ => Vec::new(),
            };
        }

        match key.code {
            KeyCode::Enter => self.send_message(),
            KeyCode::Backspace => {
                self.input.pop();
                Vec::new()
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                Vec::new()
            }
            KeyCode::Esc => {
                if self.sidebar.open {
                    self.sidebar.open = false;
                }
                Vec::new()
            }
            KeyCode::Up => {
                self.stick_to_bottom = false;
                self.scroll = self.scroll.saturating_sub(1);
                Vec::new()
            }
            KeyCode::Down => {
                self.scroll = self.scroll.saturating_add(1);
                Vec::new()
            }
            KeyCode::PageUp => {
                self.stick_to_bottom = false;
                self.scroll = self.scroll.saturating_sub(self.chat_height.max(1));
                Vec::new()
            }
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_add(self.chat_height.max(1));
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Vec<Command> {
        match mouse.kind {
            MouseEventKind::ScrollUp => {
                self.stick_to_bottom = false;
                self.scroll = self.scroll.saturating_sub(2);
                Vec::new()
            }
            MouseEventKind::ScrollDown => {
                self.scroll = self.scroll.saturating_add(2);
                Vec::new()
            }
            MouseEventKind::Down(MouseButton::Left) => {
                self.handle_click(mouse.column, mouse.row)
            }
            _ => Vec::new(),
        }
    }

    fn handle_click(&mut self, column: u16, row: u16) -> Vec<Command> {
        if self.dialog.is_some() {
            return Vec::new();
        }

        let layout = ui::layout(self.viewport, self.sidebar.open);

        // the toggle control never participates in outside-click closing,
        // otherwise a toggle click would immediately re-toggle
        if ui::rect_contains(layout.toggle, column, row) {
            self.sidebar.toggle();
            return Vec::new();
        }

        if !self.sidebar.open {
            return Vec::new();
        }

        if !ui::rect_contains(layout.sidebar, column, row) {
            // click on the overlay / anywhere outside the open panel
            self.sidebar.open = false;
            return Vec::new();
        }

        match hit_test(layout.sidebar, self.conversations.len(), column, row) {
            SidebarHit::Item(index) => {
                let id = self.conversations[index].id.clone();
                vec![Command::LoadConversation { id }]
            }
            SidebarHit::Rename(index) => {
                let entry = self.conversations[index].clone();
                self.open_rename_prompt(entry.id, entry.title);
                Vec::new()
            }
            SidebarHit::Delete(index) => {
                let id = self.conversations[index].id.clone();
                self.dialog = Some(Dialog::confirm(
                    "Are you sure you want to delete this conversation?",
                    ConfirmAction::DeleteConversation(id),
                ));
                Vec::new()
            }
            SidebarHit::Panel => Vec::new(),
        }
    }

    fn apply_dialog_outcome(&mut self, outcome: DialogOutcome) -> Vec<Command> {
        match outcome {
            DialogOutcome::Dismissed => Vec::new(),
            DialogOutcome::Confirmed(ConfirmAction::DeleteConversation(id)) => {
                vec![Command::DeleteConversation { id }]
            }
            DialogOutcome::Submitted {
                action: PromptAction::RenameConversation(id),
                value,
            } => {
                let new_title = value.trim();
                let current = self.title_of(&id).unwrap_or_default().trim();
                if new_title.is_empty() || new_title == current {
                    // same or empty title: nothing to do, no request
                    return Vec::new();
                }
                vec![Command::RenameConversation {
                    id,
                    title: new_title.to_string(),
                }]
            }
        }
    }

    // ------------------------------------------------------------------
    // Chat session controller
    // ------------------------------------------------------------------

    /// Sends the current input as a user message.
    ///
    /// Preconditions: an active conversation and a non-blank input; no
    /// send already in flight. A missing conversation surfaces a blocking
    /// notice and produces no network command at all.
    pub fn send_message(&mut self) -> Vec<Command> {
        if self.phase != SendPhase::Idle {
            return Vec::new();
        }
        if self.input.trim().is_empty() {
            return Vec::new();
        }
        let Some(id) = self.active_id.clone() else {
            self.notice("Please select or create a conversation first.");
            return Vec::new();
        };

        let message = std::mem::take(&mut self.input);
        // immediate echo; rendering derives literal-HTML mode from the
        // content itself
        self.messages.push(Message::user(message.clone()));
        self.phase = SendPhase::Sending;
        self.stick_to_bottom = true;
        debug!(%id, "sending message");
        vec![Command::SendChat { id, message }]
    }

    pub fn on_chat_event(&mut self, event: ChatEvent) -> Vec<Command> {
        match event {
            ChatEvent::Opened => {
                // response is good: typing indicator goes away, chunks
                // take over
                self.phase = SendPhase::Streaming;
            }
            ChatEvent::Chunk(text) => {
                self.pending_assistant.push_str(&text);
                self.stick_to_bottom = true;
            }
            ChatEvent::Done => {
                let content = std::mem::take(&mut self.pending_assistant);
                if !content.is_empty() {
                    self.messages.push(Message::assistant(content));
                }
                self.phase = SendPhase::Idle;
                self.stick_to_bottom = true;
                info!("assistant reply complete");
            }
            ChatEvent::Failed(err) => {
                error!(error = %err, "chat exchange failed");
                // whatever streamed before the failure stays visible
                let partial = std::mem::take(&mut self.pending_assistant);
                if !partial.is_empty() {
                    self.messages.push(Message::assistant(partial));
                }
                self.phase = SendPhase::Idle;
                self.stick_to_bottom = true;
                self.notice("An error occurred while sending the message. Please try again.");
            }
        }
        Vec::new()
    }

    // ------------------------------------------------------------------
    // Conversation management
    // ------------------------------------------------------------------

    pub fn request_new_conversation(&mut self) -> Vec<Command> {
        let title = title_for_new_conversation(chrono::Local::now());
        vec![Command::CreateConversation { title }]
    }

    fn request_rename_active(&mut self) -> Vec<Command> {
        let Some(id) = self.active_id.clone() else {
            return Vec::new();
        };
        let title = self.title_of(&id).unwrap_or_default().to_string();
        self.open_rename_prompt(id, title);
        Vec::new()
    }

    fn open_rename_prompt(&mut self, id: ConversationId, current_title: String) {
        self.dialog = Some(Dialog::prompt(
            "Enter new conversation title:",
            current_title,
            PromptAction::RenameConversation(id),
        ));
    }

    fn request_delete_active(&mut self) -> Vec<Command> {
        if let Some(id) = self.active_id.clone() {
            self.dialog = Some(Dialog::confirm(
                "Are you sure you want to delete this conversation?",
                ConfirmAction::DeleteConversation(id),
            ));
        }
        Vec::new()
    }

    fn copy_last_message(&mut self) -> Vec<Command> {
        let Some(message) = self.messages.last() else {
            return Vec::new();
        };
        let text = markdown::first_code_block(&message.content)
            .unwrap_or_else(|| message.content.clone());
        self.copied_flash = COPY_FLASH_TICKS;
        vec![Command::CopyToClipboard { text }]
    }

    fn preview_conversation(&mut self) -> Vec<Command> {
        if self.messages.is_empty() {
            return Vec::new();
        }
        vec![Command::PreviewConversation {
            title: self.header_title.clone(),
            messages: self.messages.clone(),
        }]
    }

    pub fn on_store_event(&mut self, event: StoreEvent) -> Vec<Command> {
        match event {
            StoreEvent::Listed(Ok(list)) => {
                self.conversations = list;
                match self.conversations.first() {
                    Some(first) => vec![Command::LoadConversation {
                        id: first.id.clone(),
                    }],
                    None => self.request_new_conversation(),
                }
            }
            StoreEvent::Listed(Err(err)) => {
                error!(error = %err, "listing conversations failed");
                self.notice(format!("Could not fetch conversations: {err}"));
                Vec::new()
            }
            StoreEvent::Created(Ok(summary)) => {
                let id = summary.id.clone();
                self.conversations.insert(0, summary);
                vec![Command::LoadConversation { id }]
            }
            StoreEvent::Created(Err(err)) => {
                error!(error = %err, "creating a conversation failed");
                self.notice(format!("Could not create a conversation: {err}"));
                Vec::new()
            }
            StoreEvent::Loaded { id, result } => {
                match result {
                    Ok(messages) => {
                        let title = self.title_of(&id).map(str::to_string);
                        if let Some(title) = title {
                            self.header_title = title;
                        }
                        self.active_id = Some(id);
                        self.messages = messages;
                        self.pending_assistant.clear();
                        self.stick_to_bottom = true;
                    }
                    Err(err) => {
                        error!(%id, error = %err, "loading conversation failed");
                        self.notice(err.to_string());
                    }
                }
                Vec::new()
            }
            StoreEvent::Renamed { id, title, result } => {
                match result {
                    Ok(()) => {
                        // only now, with the service's confirmation, does
                        // the label change
                        if let Some(entry) =
                            self.conversations.iter_mut().find(|c| c.id == id)
                        {
                            entry.title = title.clone();
                        }
                        if self.active_id.as_ref() == Some(&id) {
                            self.header_title = title;
                        }
                    }
                    Err(err) => {
                        error!(%id, error = %err, "renaming conversation failed");
                        self.notice(
                            "An error occurred while updating the conversation title. \
                             Please try again.",
                        );
                    }
                }
                Vec::new()
            }
            StoreEvent::Deleted { id, result } => {
                match result {
                    Ok(()) => {
                        self.conversations.retain(|c| c.id != id);
                        if self.active_id.as_ref() == Some(&id) {
                            self.active_id = None;
                            self.messages.clear();
                            self.pending_assistant.clear();
                            self.header_title = self.greeting();
                        }
                    }
                    Err(err) => {
                        error!(%id, error = %err, "deleting conversation failed");
                        self.notice("Failed to delete conversation");
                    }
                }
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use natter_core::NatterError;

    fn app() -> App {
        App::new(AppConfig::default())
    }

    fn app_with_active(id: &str) -> App {
        let mut app = app();
        app.conversations = vec![ConversationSummary {
            id: ConversationId::from(id),
            title: "Jan 5, 3:45 PM".to_string(),
        }];
        app.active_id = Some(ConversationId::from(id));
        app.header_title = "Jan 5, 3:45 PM".to_string();
        app
    }

    fn summary(id: &str, title: &str) -> ConversationSummary {
        ConversationSummary {
            id: ConversationId::from(id),
            title: title.to_string(),
        }
    }

    #[test]
    fn send_without_active_conversation_is_a_notice_and_no_commands() {
        let mut app = app();
        app.input = "hello".to_string();
        let commands = app.send_message();
        assert!(commands.is_empty(), "no network call may be issued");
        assert!(matches!(app.dialog, Some(Dialog::Notice { .. })));
        assert!(app.messages.is_empty());
        assert_eq!(app.phase, SendPhase::Idle);
    }

    #[test]
    fn send_echoes_clears_input_and_issues_chat_command() {
        let mut app = app_with_active("7");
        app.input = "hello **world**".to_string();
        let commands = app.send_message();
        assert_eq!(
            commands,
            vec![Command::SendChat {
                id: ConversationId::from("7"),
                message: "hello **world**".to_string()
            }]
        );
        assert!(app.input.is_empty());
        assert_eq!(app.messages.last(), Some(&Message::user("hello **world**")));
        assert_eq!(app.phase, SendPhase::Sending);
    }

    #[test]
    fn blank_input_is_ignored() {
        let mut app = app_with_active("7");
        app.input = "   ".to_string();
        assert!(app.send_message().is_empty());
        assert!(app.messages.is_empty());
    }

    #[test]
    fn second_send_while_in_flight_is_ignored() {
        let mut app = app_with_active("7");
        app.input = "one".to_string();
        app.send_message();
        app.input = "two".to_string();
        assert!(app.send_message().is_empty());
        assert_eq!(app.messages.len(), 1);
    }

    #[test]
    fn streamed_chunks_accumulate_into_one_assistant_message() {
        let mut app = app_with_active("7");
        app.input = "Hello".to_string();
        app.send_message();

        app.on_chat_event(ChatEvent::Opened);
        assert_eq!(app.phase, SendPhase::Streaming);
        app.on_chat_event(ChatEvent::Chunk("Hi".to_string()));
        app.on_chat_event(ChatEvent::Chunk(" there!".to_string()));
        assert_eq!(app.pending_assistant, "Hi there!");
        app.on_chat_event(ChatEvent::Done);

        assert_eq!(app.phase, SendPhase::Idle);
        assert_eq!(
            app.messages.last(),
            Some(&Message::assistant("Hi there!"))
        );
        assert!(app.pending_assistant.is_empty());
        assert!(app.stick_to_bottom);
    }

    #[test]
    fn failure_mid_stream_keeps_partial_output_and_notifies() {
        let mut app = app_with_active("7");
        app.input = "Hello".to_string();
        app.send_message();
        app.on_chat_event(ChatEvent::Opened);
        app.on_chat_event(ChatEvent::Chunk("par".to_string()));
        app.on_chat_event(ChatEvent::Failed(NatterError::transport("broken pipe")));

        assert_eq!(app.phase, SendPhase::Idle, "indicator must be hidden");
        assert_eq!(app.messages.last(), Some(&Message::assistant("par")));
        assert!(matches!(app.dialog, Some(Dialog::Notice { .. })));
    }

    #[test]
    fn failure_before_response_also_resets_phase() {
        let mut app = app_with_active("7");
        app.input = "Hello".to_string();
        app.send_message();
        app.on_chat_event(ChatEvent::Failed(NatterError::status(500, "boom")));
        assert_eq!(app.phase, SendPhase::Idle);
        assert!(matches!(app.dialog, Some(Dialog::Notice { .. })));
    }

    #[test]
    fn empty_conversation_shows_empty_state_and_loaded_one_does_not() {
        let mut app = app();
        app.conversations = vec![summary("3", "t")];
        app.on_store_event(StoreEvent::Loaded {
            id: ConversationId::from("3"),
            result: Ok(Vec::new()),
        });
        assert!(app.shows_empty_state());

        app.on_store_event(StoreEvent::Loaded {
            id: ConversationId::from("3"),
            result: Ok(vec![Message::user("hi")]),
        });
        assert!(!app.shows_empty_state());
    }

    #[test]
    fn load_error_shows_notice_and_keeps_state() {
        let mut app = app_with_active("7");
        app.messages = vec![Message::user("old")];
        app.on_store_event(StoreEvent::Loaded {
            id: ConversationId::from("9"),
            result: Err(NatterError::service("Conversation not found")),
        });
        assert_eq!(app.active_id, Some(ConversationId::from("7")));
        assert_eq!(app.messages.len(), 1);
        assert!(matches!(app.dialog, Some(Dialog::Notice { .. })));
    }

    #[test]
    fn load_marks_the_conversation_active_and_sets_header() {
        let mut app = app();
        app.conversations = vec![summary("1", "First"), summary("2", "Second")];
        app.on_store_event(StoreEvent::Loaded {
            id: ConversationId::from("2"),
            result: Ok(Vec::new()),
        });
        assert_eq!(app.active_id, Some(ConversationId::from("2")));
        assert_eq!(app.header_title, "Second");
    }

    #[test]
    fn deleting_the_active_conversation_resets_view_and_greeting() {
        let mut app = app_with_active("7");
        app.messages = vec![Message::user("hi")];
        app.on_store_event(StoreEvent::Deleted {
            id: ConversationId::from("7"),
            result: Ok(()),
        });
        assert!(app.active_id.is_none());
        assert!(app.messages.is_empty());
        assert_eq!(app.header_title, app.greeting());
        assert!(app.conversations.is_empty());
    }

    #[test]
    fn deleting_a_non_active_conversation_keeps_the_active_one() {
        let mut app = app_with_active("7");
        app.conversations.push(summary("8", "Other"));
        app.on_store_event(StoreEvent::Deleted {
            id: ConversationId::from("8"),
            result: Ok(()),
        });
        assert_eq!(app.active_id, Some(ConversationId::from("7")));
        assert_eq!(app.conversations.len(), 1);
    }

    #[test]
    fn delete_failure_keeps_the_entry_and_notifies() {
        let mut app = app_with_active("7");
        app.on_store_event(StoreEvent::Deleted {
            id: ConversationId::from("7"),
            result: Err(NatterError::service("nope")),
        });
        assert_eq!(app.conversations.len(), 1);
        assert_eq!(app.active_id, Some(ConversationId::from("7")));
        assert!(matches!(app.dialog, Some(Dialog::Notice { .. })));
    }

    #[test]
    fn rename_to_trimmed_equal_title_issues_no_request() {
        let mut app = app_with_active("7");
        let commands = app.apply_dialog_outcome(DialogOutcome::Submitted {
            action: PromptAction::RenameConversation(ConversationId::from("7")),
            value: "  Jan 5, 3:45 PM  ".to_string(),
        });
        assert!(commands.is_empty());
    }

    #[test]
    fn rename_to_empty_title_issues_no_request() {
        let mut app = app_with_active("7");
        let commands = app.apply_dialog_outcome(DialogOutcome::Submitted {
            action: PromptAction::RenameConversation(ConversationId::from("7")),
            value: "   ".to_string(),
        });
        assert!(commands.is_empty());
    }

    #[test]
    fn rename_updates_label_only_after_confirmation() {
        let mut app = app_with_active("7");
        let commands = app.apply_dialog_outcome(DialogOutcome::Submitted {
            action: PromptAction::RenameConversation(ConversationId::from("7")),
            value: "Better title".to_string(),
        });
        assert_eq!(
            commands,
            vec![Command::RenameConversation {
                id: ConversationId::from("7"),
                title: "Better title".to_string()
            }]
        );
        // not yet: the service has not confirmed
        assert_eq!(app.conversations[0].title, "Jan 5, 3:45 PM");
        assert_eq!(app.header_title, "Jan 5, 3:45 PM");

        app.on_store_event(StoreEvent::Renamed {
            id: ConversationId::from("7"),
            title: "Better title".to_string(),
            result: Ok(()),
        });
        assert_eq!(app.conversations[0].title, "Better title");
        assert_eq!(app.header_title, "Better title");
    }

    #[test]
    fn rename_failure_leaves_labels_unchanged() {
        let mut app = app_with_active("7");
        app.on_store_event(StoreEvent::Renamed {
            id: ConversationId::from("7"),
            title: "Better title".to_string(),
            result: Err(NatterError::status(500, "boom")),
        });
        assert_eq!(app.conversations[0].title, "Jan 5, 3:45 PM");
        assert!(matches!(app.dialog, Some(Dialog::Notice { .. })));
    }

    #[test]
    fn rename_of_non_active_conversation_leaves_header_alone() {
        let mut app = app_with_active("7");
        app.conversations.push(summary("8", "Other"));
        app.on_store_event(StoreEvent::Renamed {
            id: ConversationId::from("8"),
            title: "Renamed".to_string(),
            result: Ok(()),
        });
        assert_eq!(app.header_title, "Jan 5, 3:45 PM");
        assert_eq!(app.conversations[1].title, "Renamed");
    }

    #[test]
    fn created_conversation_is_prepended_and_loaded() {
        let mut app = app();
        app.conversations = vec![summary("1", "Old")];
        let commands = app.on_store_event(StoreEvent::Created(Ok(summary("2", "New"))));
        assert_eq!(app.conversations[0].title, "New");
        assert_eq!(
            commands,
            vec![Command::LoadConversation {
                id: ConversationId::from("2")
            }]
        );
    }

    #[test]
    fn startup_with_conversations_loads_the_first() {
        let mut app = app();
        let commands = app.on_store_event(StoreEvent::Listed(Ok(vec![
            summary("a", "A"),
            summary("b", "B"),
        ])));
        assert_eq!(
            commands,
            vec![Command::LoadConversation {
                id: ConversationId::from("a")
            }]
        );
    }

    #[test]
    fn startup_with_no_conversations_creates_one() {
        let mut app = app();
        let commands = app.on_store_event(StoreEvent::Listed(Ok(Vec::new())));
        assert!(matches!(
            commands.as_slice(),
            [Command::CreateConversation { .. }]
        ));
    }

    #[test]
    fn dialog_blocks_ordinary_input() {
        let mut app = app_with_active("7");
        app.notice("blocked");
        let commands = app.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        assert!(commands.is_empty());
        assert!(app.input.is_empty(), "typing must go to the dialog, not the input");
    }

    #[test]
    fn toggle_control_click_never_double_toggles() {
        let mut app = app_with_active("7");
        app.viewport = ratatui::layout::Rect::new(0, 0, 100, 30);
        assert!(app.sidebar.open);
        app.handle_click(0, 0);
        assert!(!app.sidebar.open);
        app.handle_click(0, 0);
        assert!(app.sidebar.open);
    }

    #[test]
    fn click_outside_the_open_panel_closes_it() {
        let mut app = app_with_active("7");
        app.viewport = ratatui::layout::Rect::new(0, 0, 100, 30);
        let commands = app.handle_click(80, 10);
        assert!(commands.is_empty());
        assert!(!app.sidebar.open);
    }

    #[test]
    fn click_on_a_sidebar_entry_loads_it() {
        let mut app = app_with_active("7");
        app.viewport = ratatui::layout::Rect::new(0, 0, 100, 30);
        let commands = app.handle_click(5, 2);
        assert_eq!(
            commands,
            vec![Command::LoadConversation {
                id: ConversationId::from("7")
            }]
        );
        assert!(app.sidebar.open, "loading must not close the panel");
    }

    #[test]
    fn clicks_are_blocked_while_a_dialog_is_up() {
        let mut app = app_with_active("7");
        app.viewport = ratatui::layout::Rect::new(0, 0, 100, 30);
        app.notice("blocked");
        let commands = app.handle_click(5, 2);
        assert!(commands.is_empty());
        assert!(app.sidebar.open);
    }

    #[test]
    fn copy_prefers_the_code_block_and_flashes() {
        let mut app = app_with_active("7");
        app.messages.push(Message::assistant(
            "see:\n```python\nprint(1)\n```\ndone",
        ));
        let commands = app.copy_last_message();
        assert_eq!(
            commands,
            vec![Command::CopyToClipboard {
                text: "print(1)\n".to_string()
            }]
        );
        assert!(app.copied_flash > 0);
    }

    #[test]
    fn copy_without_code_block_takes_whole_content() {
        let mut app = app_with_active("7");
        app.messages.push(Message::assistant("plain reply"));
        let commands = app.copy_last_message();
        assert_eq!(
            commands,
            vec![Command::CopyToClipboard {
                text: "plain reply".to_string()
            }]
        );
    }
}
