//! Syntax highlighting for fenced code blocks.
//!
//! Highlighted output is class-based span HTML; presentation is left to
//! the stylesheet of whatever page embeds it.

use super::sanitize::escape_html;
use once_cell::sync::Lazy;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

static SYNTAXES: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);

/// The shared syntax definitions (loaded once).
pub fn syntax_set() -> &'static SyntaxSet {
    &SYNTAXES
}

/// Language used when a fence carries no annotation.
pub const PLAINTEXT: &str = "plaintext";

/// Looks up a syntax definition for a fence annotation.
///
/// Unknown languages resolve to the plain-text syntax rather than failing,
/// so an unrecognized fence still renders.
pub fn find_syntax(language: &str) -> &'static SyntaxReference {
    let set = syntax_set();
    set.find_syntax_by_token(language)
        .or_else(|| set.find_syntax_by_extension(language))
        .unwrap_or_else(|| set.find_syntax_plain_text())
}

/// Renders one fenced code block as a container with a header row naming
/// the language next to a copy-button element. The button is addressed by
/// class; event wiring is the embedder's job, never inline markup.
pub fn code_block_html(language: &str, code: &str) -> String {
    let language = if language.is_empty() { PLAINTEXT } else { language };
    let label = escape_html(language);
    let body = highlight_html(language, code).unwrap_or_else(|_| escape_html(code));
    format!(
        "<div class=\"code-block\">\
<div class=\"code-block-header\">\
<span class=\"language\">{label}</span>\
<button class=\"copy-button\" type=\"button\">Copy</button>\
</div>\
<pre><code class=\"language-{label}\">{body}</code></pre>\
</div>"
    )
}

/// Highlights `code` into class-based spans. Any failure falls back to the
/// escaped, unhighlighted text at the call site; a single bad block never
/// poisons the rest of the document.
fn highlight_html(language: &str, code: &str) -> Result<String, syntect::Error> {
    let syntax = find_syntax(language);
    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, syntax_set(), ClassStyle::Spaced);
    for line in LinesWithEndings::from(code) {
        generator.parse_html_for_line_which_includes_newline(line)?;
    }
    Ok(generator.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_language_falls_back_to_plain_text() {
        let html = code_block_html("definitely-not-a-language", "let x = 1;");
        assert!(html.contains("definitely-not-a-language"));
        assert!(html.contains("let x = 1;"));
    }

    #[test]
    fn rust_code_produces_spans() {
        let html = code_block_html("rust", "fn main() {}\n");
        assert!(html.contains("<span"), "expected highlighted spans: {html}");
    }

    #[test]
    fn code_content_is_never_raw_markup() {
        let html = code_block_html("plaintext", "<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn language_label_is_escaped() {
        let html = code_block_html("\"><script>", "x");
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn empty_annotation_is_plaintext() {
        let html = code_block_html("", "hello");
        assert!(html.contains(">plaintext</span>"));
    }
}
