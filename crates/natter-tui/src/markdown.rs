//! Terminal presentation of message content.
//!
//! This is the in-pane rendering path: markdown styled as terminal text,
//! fenced code blocks highlighted via syntect. The canonical sanitized
//! HTML rendering lives in natter-core; this module only decides how raw
//! content looks inside the chat pane.

use natter_core::render::highlight::{find_syntax, syntax_set};
use natter_core::render::looks_like_literal_html;
use once_cell::sync::Lazy;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Style as SyntectStyle, Theme, ThemeSet};

static THEME: Lazy<Theme> = Lazy::new(|| {
    let mut themes = ThemeSet::load_defaults().themes;
    themes
        .remove("base16-ocean.dark")
        .or_else(|| {
            let first = themes.keys().next().cloned()?;
            themes.remove(&first)
        })
        .unwrap_or_default()
});

/// Renders raw message content into terminal lines.
///
/// Literal-HTML content (trimmed input wrapped in `<`...`>`) is shown
/// verbatim rather than markdown-styled, matching the renderer's
/// literal mode.
pub fn message_lines(content: &str) -> Vec<Line<'static>> {
    if looks_like_literal_html(content) {
        return content
            .lines()
            .map(|line| Line::raw(line.to_string()))
            .collect();
    }

    let mut lines = Vec::new();
    let mut fence: Option<CodeFence> = None;

    for raw in content.lines() {
        if let Some(language) = detect_code_fence(raw) {
            match fence.take() {
                Some(_) => lines.push(Line::raw(String::new())),
                None => {
                    fence = Some(CodeFence::new(&language));
                    lines.push(fence_header(&language));
                }
            }
            continue;
        }
        match fence.as_mut() {
            Some(block) => lines.push(block.highlight(raw)),
            None => lines.push(markdown_line(raw)),
        }
    }

    lines
}

/// Extracts the text of the first fenced code block, if any. Used by the
/// copy affordance: copying a message grabs its code before its prose.
pub fn first_code_block(content: &str) -> Option<String> {
    let mut inside = false;
    let mut code = String::new();
    for raw in content.lines() {
        if detect_code_fence(raw).is_some() {
            if inside {
                return Some(code);
            }
            inside = true;
            continue;
        }
        if inside {
            code.push_str(raw);
            code.push('\n');
        }
    }
    // an unterminated fence still counts once it has content
    if inside && !code.is_empty() { Some(code) } else { None }
}

/// Recognizes a fence line and returns its language annotation
/// (empty for a bare fence or a closing fence).
fn detect_code_fence(line: &str) -> Option<String> {
    let trimmed = line.trim_start();
    let rest = trimmed
        .strip_prefix("```")
        .or_else(|| trimmed.strip_prefix("~~~"))?;
    Some(rest.trim().split_whitespace().next().unwrap_or("").to_string())
}

struct CodeFence {
    highlighter: HighlightLines<'static>,
}

impl CodeFence {
    fn new(language: &str) -> Self {
        let lang = if language.is_empty() { "plaintext" } else { language };
        Self {
            highlighter: HighlightLines::new(find_syntax(lang), &THEME),
        }
    }

    fn highlight(&mut self, line: &str) -> Line<'static> {
        match self.highlighter.highlight_line(line, syntax_set()) {
            Ok(regions) => Line::from(
                regions
                    .into_iter()
                    .map(|(style, text)| {
                        Span::styled(text.to_string(), syntect_to_tui(style))
                    })
                    .collect::<Vec<_>>(),
            ),
            // a bad line degrades to plain text; never fails the message
            Err(_) => Line::raw(line.to_string()),
        }
    }
}

fn fence_header(language: &str) -> Line<'static> {
    let label = if language.is_empty() { "plaintext" } else { language };
    Line::from(Span::styled(
        format!("── {label} ──"),
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Map a syntect style to a ratatui style.
fn syntect_to_tui(style: SyntectStyle) -> Style {
    let fg = style.foreground;
    let mut out = Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b));
    if style.font_style.contains(FontStyle::BOLD) {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        out = out.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        out = out.add_modifier(Modifier::UNDERLINED);
    }
    out
}

/// Styles one prose line: headings, blockquotes, bullets, then inline
/// emphasis inside the remainder.
fn markdown_line(line: &str) -> Line<'static> {
    let trimmed = line.trim_start();
    if let Some(rest) = trimmed.strip_prefix('#') {
        let text = rest.trim_start_matches('#').trim_start().to_string();
        return Line::from(Span::styled(
            text,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
    }
    if let Some(rest) = trimmed.strip_prefix("> ") {
        return Line::from(Span::styled(
            format!("│ {rest}"),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
    }
    let mut spans = Vec::new();
    if let Some(rest) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* ")) {
        spans.push(Span::raw("• ".to_string()));
        spans.extend(inline_spans(rest, Style::default()));
        return Line::from(spans);
    }
    Line::from(inline_spans(line, Style::default()))
}

/// Splits a prose line into spans for `**bold**`, `*italic*`, and
/// `` `code` `` runs.
fn inline_spans(text: &str, base: Style) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut plain = String::new();
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;

    let mut flush = |plain: &mut String, spans: &mut Vec<Span<'static>>| {
        if !plain.is_empty() {
            spans.push(Span::styled(std::mem::take(plain), base));
        }
    };

    while i < chars.len() {
        if chars[i] == '`' {
            if let Some(end) = find_from(&chars, i + 1, '`') {
                flush(&mut plain, &mut spans);
                let code: String = chars[i + 1..end].iter().collect();
                spans.push(Span::styled(
                    code,
                    Style::default().fg(Color::Yellow).bg(Color::Black),
                ));
                i = end + 1;
                continue;
            }
        }
        if chars[i] == '*' && i + 1 < chars.len() && chars[i + 1] == '*' {
            if let Some(end) = find_pair_from(&chars, i + 2) {
                flush(&mut plain, &mut spans);
                let bold: String = chars[i + 2..end].iter().collect();
                spans.push(Span::styled(
                    bold,
                    base.add_modifier(Modifier::BOLD),
                ));
                i = end + 2;
                continue;
            }
        }
        if chars[i] == '*' {
            if let Some(end) = find_from(&chars, i + 1, '*') {
                flush(&mut plain, &mut spans);
                let italic: String = chars[i + 1..end].iter().collect();
                spans.push(Span::styled(
                    italic,
                    base.add_modifier(Modifier::ITALIC),
                ));
                i = end + 1;
                continue;
            }
        }
        plain.push(chars[i]);
        i += 1;
    }
    flush(&mut plain, &mut spans);
    spans
}

fn find_from(chars: &[char], start: usize, needle: char) -> Option<usize> {
    (start..chars.len()).find(|&j| chars[j] == needle)
}

/// Finds the next `**` at or after `start`.
fn find_pair_from(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start;
    while j + 1 < chars.len() {
        if chars[j] == '*' && chars[j + 1] == '*' {
            return Some(j);
        }
        j += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn fence_detection_reads_the_language() {
        assert_eq!(detect_code_fence("```rust"), Some("rust".to_string()));
        assert_eq!(detect_code_fence("```"), Some(String::new()));
        assert_eq!(detect_code_fence("plain text"), None);
    }

    #[test]
    fn code_block_gets_header_line() {
        let lines = message_lines("```rust\nfn main() {}\n```");
        assert_eq!(line_text(&lines[0]), "── rust ──");
        assert_eq!(line_text(&lines[1]), "fn main() {}");
    }

    #[test]
    fn unknown_fence_language_still_renders() {
        let lines = message_lines("```nope-lang\nhello\n```");
        assert_eq!(line_text(&lines[1]), "hello");
    }

    #[test]
    fn literal_html_is_shown_verbatim() {
        let lines = message_lines("<div>**not bold**</div>");
        assert_eq!(line_text(&lines[0]), "<div>**not bold**</div>");
        assert_eq!(lines[0].spans.len(), 1);
    }

    #[test]
    fn bold_and_code_runs_are_split_into_spans() {
        let spans = inline_spans("a **b** and `c`", Style::default());
        let texts: Vec<_> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(texts, vec!["a ", "b", " and ", "c"]);
    }

    #[test]
    fn unbalanced_markers_stay_literal() {
        let spans = inline_spans("2 * 3 equals 6", Style::default());
        let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "2 * 3 equals 6");
    }

    #[test]
    fn bullets_are_rendered_with_a_dot() {
        let lines = message_lines("- first");
        assert_eq!(line_text(&lines[0]), "• first");
    }

    #[test]
    fn first_code_block_extracts_code_only() {
        let content = "intro\n```python\nprint(1)\nprint(2)\n```\noutro";
        assert_eq!(
            first_code_block(content),
            Some("print(1)\nprint(2)\n".to_string())
        );
    }

    #[test]
    fn first_code_block_is_none_without_fences() {
        assert_eq!(first_code_block("just prose"), None);
    }
}
