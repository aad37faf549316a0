//! Message rendering: raw text to sanitized HTML markup.
//!
//! The renderer is deliberately decoupled from any UI tree: it takes raw
//! message text and produces a sanitized markup string, so the rendering
//! contract is testable without a live page or terminal.
//!
//! Two modes:
//! - literal-HTML mode escapes the input and returns it as-is;
//! - markdown mode parses GitHub-flavored markdown (soft line breaks
//!   become hard breaks), sanitizes raw HTML against an allow-list, and
//!   replaces fenced code blocks with highlighted containers.

pub mod highlight;
pub mod sanitize;

pub use sanitize::escape_html;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd, html};
use sanitize::RawHtmlSanitizer;

/// Detects the literal-HTML input convention: the trimmed text starts
/// with `<` and ends with `>`.
pub fn looks_like_literal_html(input: &str) -> bool {
    let trimmed = input.trim();
    trimmed.len() >= 2 && trimmed.starts_with('<') && trimmed.ends_with('>')
}

/// Renders raw message text into sanitized HTML markup.
///
/// With `literal_html` set the input is escaped verbatim; otherwise it is
/// treated as markdown.
pub fn render_message(content: &str, literal_html: bool) -> String {
    if literal_html {
        return escape_html(content);
    }
    render_markdown(content)
}

fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

fn render_markdown(content: &str) -> String {
    let mut sanitizer = RawHtmlSanitizer::new();
    let mut events: Vec<Event> = Vec::new();
    let mut parser = Parser::new_ext(content, markdown_options());

    while let Some(event) = parser.next() {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let language = fence_language(&kind);
                let mut code = String::new();
                for inner in parser.by_ref() {
                    match inner {
                        Event::End(TagEnd::CodeBlock) => break,
                        Event::Text(text) => code.push_str(&text),
                        _ => {}
                    }
                }
                events.push(Event::Html(
                    highlight::code_block_html(&language, &code).into(),
                ));
            }
            Event::SoftBreak => events.push(Event::HardBreak),
            Event::Html(raw) => {
                events.push(Event::Html(sanitizer.sanitize_fragment(&raw).into()));
            }
            Event::InlineHtml(raw) => {
                events.push(Event::InlineHtml(sanitizer.sanitize_fragment(&raw).into()));
            }
            other => events.push(other),
        }
    }

    let mut out = String::new();
    html::push_html(&mut out, events.into_iter());
    out
}

fn fence_language(kind: &CodeBlockKind) -> String {
    match kind {
        CodeBlockKind::Fenced(info) => {
            let token = info.split_whitespace().next().unwrap_or("");
            if token.is_empty() {
                highlight::PLAINTEXT.to_string()
            } else {
                token.to_string()
            }
        }
        CodeBlockKind::Indented => highlight::PLAINTEXT.to_string(),
    }
}
