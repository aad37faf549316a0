//! natter - terminal client for a conversation service.

mod app;
mod dialog;
mod event;
mod markdown;
mod preview;
mod sidebar;
mod ui;

use crate::app::{App, Command};
use crate::event::{AppEvent, StoreEvent};
use anyhow::Result;
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use natter_client::{ConversationStore, HttpConversationStore};
use natter_core::config::AppConfig;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::Stdout;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "natter")]
#[command(about = "Terminal client for a conversation service", long_about = None)]
struct Cli {
    /// Base URL of the conversation service (overrides the config file)
    #[arg(long)]
    server: Option<String>,

    /// Path to the config file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config.or_else(AppConfig::default_path) {
        Some(path) => AppConfig::load(&path)?,
        None => AppConfig::default(),
    };
    if let Ok(url) = std::env::var("NATTER_SERVER_URL") {
        config.server_url = url;
    }
    if let Some(server) = cli.server {
        config.server_url = server;
    }

    init_logging(&config)?;

    let store: Arc<dyn ConversationStore> =
        Arc::new(HttpConversationStore::new(config.server_url.clone()));
    let mut app = App::new(config);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, store).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

/// Logs go to a file under the data dir; the terminal belongs to the UI.
fn init_logging(config: &AppConfig) -> Result<()> {
    let dir = dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("natter");
    std::fs::create_dir_all(&dir)?;
    let file = std::fs::File::create(dir.join("natter.log"))?;

    let filter = std::env::var("NATTER_LOG")
        .ok()
        .or_else(|| config.log_filter.clone())
        .unwrap_or_else(|| "natter=info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .init();
    Ok(())
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    store: Arc<dyn ConversationStore>,
) -> Result<()> {
    let (tx, mut rx): (UnboundedSender<AppEvent>, UnboundedReceiver<AppEvent>) =
        unbounded_channel();

    event::spawn_input_thread(tx.clone());
    event::spawn_tick_task(tx.clone());

    for command in app.startup() {
        dispatch(command, &store, &tx);
    }

    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;
        let Some(event) = rx.recv().await else { break };
        for command in app.handle_event(event) {
            dispatch(command, &store, &tx);
        }
        if app.quit {
            break;
        }
    }
    Ok(())
}

/// Executes one controller command, reporting completion back over the
/// event channel.
fn dispatch(
    command: Command,
    store: &Arc<dyn ConversationStore>,
    tx: &UnboundedSender<AppEvent>,
) {
    let tx = tx.clone();
    match command {
        Command::ListConversations => {
            let store = store.clone();
            tokio::spawn(async move {
                let result = store.list().await;
                let _ = tx.send(AppEvent::Store(StoreEvent::Listed(result)));
            });
        }
        Command::CreateConversation { title } => {
            let store = store.clone();
            tokio::spawn(async move {
                let result = store.create(&title).await;
                let _ = tx.send(AppEvent::Store(StoreEvent::Created(result)));
            });
        }
        Command::LoadConversation { id } => {
            let store = store.clone();
            tokio::spawn(async move {
                let result = store.load(&id).await;
                let _ = tx.send(AppEvent::Store(StoreEvent::Loaded { id, result }));
            });
        }
        Command::RenameConversation { id, title } => {
            let store = store.clone();
            tokio::spawn(async move {
                let result = store.rename(&id, &title).await;
                let _ = tx.send(AppEvent::Store(StoreEvent::Renamed { id, title, result }));
            });
        }
        Command::DeleteConversation { id } => {
            let store = store.clone();
            tokio::spawn(async move {
                let result = store.delete(&id).await;
                let _ = tx.send(AppEvent::Store(StoreEvent::Deleted { id, result }));
            });
        }
        Command::SendChat { id, message } => {
            let store = store.clone();
            tokio::spawn(async move {
                let (chat_tx, mut chat_rx) = unbounded_channel();
                let forward_tx = tx.clone();
                let forwarder = tokio::spawn(async move {
                    while let Some(chat_event) = chat_rx.recv().await {
                        if forward_tx.send(AppEvent::Chat(chat_event)).is_err() {
                            break;
                        }
                    }
                });
                store.chat(&id, &message, chat_tx).await;
                let _ = forwarder.await;
            });
        }
        Command::CopyToClipboard { text } => {
            let copy = arboard::Clipboard::new().and_then(|mut clipboard| {
                clipboard.set_text(text)
            });
            if let Err(err) = copy {
                warn!(error = %err, "clipboard copy failed");
                let _ = tx.send(AppEvent::Failure(format!("Could not copy: {err}")));
            }
        }
        Command::PreviewConversation { title, messages } => {
            tokio::spawn(async move {
                let result = tokio::task::spawn_blocking(move || {
                    preview::export_and_open(&title, &messages)
                })
                .await;
                match result {
                    Ok(Ok(_path)) => {}
                    Ok(Err(err)) => {
                        warn!(error = %err, "preview failed");
                        let _ =
                            tx.send(AppEvent::Failure(format!("Could not open preview: {err}")));
                    }
                    Err(err) => {
                        warn!(error = %err, "preview task panicked");
                        let _ = tx.send(AppEvent::Failure("Preview failed".to_string()));
                    }
                }
            });
        }
    }
}
