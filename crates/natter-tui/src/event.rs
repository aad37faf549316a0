//! Application events and the tasks that produce them.

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use natter_client::ChatEvent;
use natter_core::Result;
use natter_core::conversation::{ConversationId, ConversationSummary, Message};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Everything the UI loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    Tick,
    Key(KeyEvent),
    Mouse(MouseEvent),
    Chat(ChatEvent),
    Store(StoreEvent),
    /// A local operation (clipboard, preview) failed.
    Failure(String),
}

/// Completion of a conversation-store request.
#[derive(Debug)]
pub enum StoreEvent {
    Created(Result<ConversationSummary>),
    Listed(Result<Vec<ConversationSummary>>),
    Loaded {
        id: ConversationId,
        result: Result<Vec<Message>>,
    },
    Renamed {
        id: ConversationId,
        title: String,
        result: Result<()>,
    },
    Deleted {
        id: ConversationId,
        result: Result<()>,
    },
}

/// Forwards terminal input to the UI loop from a dedicated thread; the
/// crossterm reader blocks, so it cannot live on the runtime.
pub fn spawn_input_thread(tx: UnboundedSender<AppEvent>) {
    std::thread::spawn(move || {
        loop {
            if !event::poll(Duration::from_millis(250)).unwrap_or(false) {
                continue;
            }
            match event::read() {
                Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    if tx.send(AppEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CrosstermEvent::Mouse(mouse)) => {
                    if tx.send(AppEvent::Mouse(mouse)).is_err() {
                        break;
                    }
                }
                _ => {}
            }
        }
    });
}

/// Periodic tick driving the typing indicator and transient feedback.
pub fn spawn_tick_task(tx: UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(200));
        loop {
            interval.tick().await;
            if tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });
}
