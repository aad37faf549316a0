//! Layout and drawing.

use crate::app::{App, SendPhase};
use crate::dialog::Dialog;
use crate::markdown;
use crate::sidebar::SIDEBAR_WIDTH;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};

/// Screen regions for one frame. Computed identically by the draw pass
/// and the mouse handlers, so hit-testing always matches what is on
/// screen.
#[derive(Debug, Clone, Copy)]
pub struct AppLayout {
    pub header: Rect,
    /// The sidebar toggle control at the left edge of the header.
    pub toggle: Rect,
    pub sidebar: Rect,
    pub chat: Rect,
    pub input: Rect,
}

pub fn layout(area: Rect, sidebar_open: bool) -> AppLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(area);

    let header = rows[0];
    let toggle = Rect {
        x: header.x,
        y: header.y,
        width: 3.min(header.width),
        height: header.height,
    };

    let sidebar_width = if sidebar_open {
        SIDEBAR_WIDTH.min(area.width / 3).max(16).min(area.width)
    } else {
        0
    };
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(sidebar_width), Constraint::Min(10)])
        .split(rows[1]);

    AppLayout {
        header,
        toggle,
        sidebar: body[0],
        chat: body[1],
        input: rows[2],
    }
}

pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x + rect.width
        && row >= rect.y
        && row < rect.y + rect.height
}

pub fn draw(frame: &mut Frame, app: &mut App) {
    app.viewport = frame.size();
    let layout = layout(app.viewport, app.sidebar.open);

    draw_header(frame, layout, app);
    if app.sidebar.open {
        draw_sidebar(frame, layout.sidebar, app);
    }
    draw_chat(frame, layout.chat, app);
    draw_input(frame, layout.input, app);

    if let Some(dialog) = &app.dialog {
        draw_dialog(frame, app.viewport, dialog);
    }
}

fn draw_header(frame: &mut Frame, layout: AppLayout, app: &App) {
    let mut spans = vec![
        Span::styled("[≡]", Style::default().fg(Color::Cyan)),
        Span::raw(" "),
        Span::styled(
            app.header_title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];
    if app.copied_flash > 0 {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            "copied",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), layout.header);
}

fn draw_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .conversations
        .iter()
        .map(|summary| {
            let active = app.active_id.as_ref() == Some(&summary.id);
            let marker = if active { "▸ " } else { "  " };
            let width = area.width.saturating_sub(11) as usize;
            let mut title = summary.title.clone();
            if title.chars().count() > width {
                title = title.chars().take(width.saturating_sub(1)).collect();
                title.push('…');
            }
            let style = if active {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let pad = width.saturating_sub(title.chars().count());
            ListItem::new(Line::from(vec![
                Span::styled(format!("{marker}{title}"), style),
                Span::raw(" ".repeat(pad)),
                Span::styled("[e]", Style::default().fg(Color::DarkGray)),
                Span::raw(" "),
                Span::styled("[x]", Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default().borders(Borders::ALL).title(Span::styled(
            "Conversations (^N new)",
            Style::default().fg(Color::Cyan),
        )),
    );
    frame.render_widget(list, area);
}

fn draw_chat(frame: &mut Frame, area: Rect, app: &mut App) {
    let inner_height = area.height.saturating_sub(2);
    app.chat_height = inner_height;

    let block = Block::default().borders(Borders::ALL);

    if app.shows_empty_state() {
        let placeholder = Paragraph::new(Text::from(vec![
            Line::raw(""),
            Line::styled(
                "This conversation is empty. Start by sending a message!",
                Style::default().fg(Color::DarkGray),
            ),
        ]))
        .block(block)
        .alignment(Alignment::Center);
        frame.render_widget(placeholder, area);
        return;
    }

    let mut text = Text::default();
    for message in &app.messages {
        text.push_line(role_header(message));
        for line in markdown::message_lines(&message.content) {
            text.push_line(line);
        }
        text.push_line(Line::raw(""));
    }

    if !app.pending_assistant.is_empty() {
        text.push_line(Line::styled(
            "Assistant",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ));
        let streaming = format!("{}▌", app.pending_assistant);
        for line in markdown::message_lines(&streaming) {
            text.push_line(line);
        }
        text.push_line(Line::raw(""));
    }

    if app.phase == SendPhase::Sending {
        text.push_line(typing_indicator(app.tick));
    }

    let total = text.lines.len() as u16;
    if app.stick_to_bottom {
        app.scroll = total.saturating_sub(inner_height);
    } else {
        app.scroll = app.scroll.min(total.saturating_sub(1));
    }

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0));
    frame.render_widget(paragraph, area);
}

fn role_header(message: &natter_core::conversation::Message) -> Line<'static> {
    use natter_core::conversation::MessageRole;
    match message.role {
        MessageRole::User => Line::styled(
            "You",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        MessageRole::Assistant => Line::styled(
            "Assistant",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
    }
}

fn typing_indicator(tick: u64) -> Line<'static> {
    let frames = ["●∙∙", "∙●∙", "∙∙●"];
    let frame = frames[(tick / 2) as usize % frames.len()];
    Line::styled(frame.to_string(), Style::default().fg(Color::DarkGray))
}

fn draw_input(frame: &mut Frame, area: Rect, app: &App) {
    let title = if app.phase == SendPhase::Idle {
        "Message (Enter to send)"
    } else {
        "Message (waiting for reply…)"
    };
    let input = Paragraph::new(app.input.as_str())
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(input, area);
    if app.dialog.is_none() {
        frame.set_cursor(
            area.x + 1 + app.input.chars().count() as u16,
            area.y + 1,
        );
    }
}

fn draw_dialog(frame: &mut Frame, viewport: Rect, dialog: &Dialog) {
    let area = popup_rect(viewport);
    frame.render_widget(Clear, area);

    let (title, body, hint) = match dialog {
        Dialog::Notice { message } => ("Notice", message.clone(), "Enter to dismiss"),
        Dialog::Confirm { message, .. } => ("Confirm", message.clone(), "[y]es  [n]o"),
        Dialog::Prompt { title, value, .. } => {
            (title.as_str(), value.clone(), "Enter to accept, Esc to cancel")
        }
    };

    let text = Text::from(vec![
        Line::raw(""),
        Line::raw(body),
        Line::raw(""),
        Line::styled(hint, Style::default().fg(Color::DarkGray)),
    ]);
    let paragraph = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(paragraph, area);
}

fn popup_rect(viewport: Rect) -> Rect {
    let width = (viewport.width * 3 / 5).clamp(20, 70).min(viewport.width);
    let height = 6.min(viewport.height);
    Rect {
        x: viewport.x + (viewport.width.saturating_sub(width)) / 2,
        y: viewport.y + (viewport.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
