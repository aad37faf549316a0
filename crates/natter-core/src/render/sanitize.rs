//! Allow-list sanitization of raw HTML embedded in markdown.
//!
//! Raw HTML events from the markdown parser pass through
//! [`RawHtmlSanitizer`] before reaching the output. Benign inline markup is
//! kept with a small attribute allow-list; script-capable elements are
//! removed, `script`/`style`/`iframe` together with their entire content.

/// Escape the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Elements dropped together with everything up to their closing tag.
const DROP_WITH_CONTENT: &[&str] = &["script", "style", "iframe"];

/// Elements whose tags are removed while surrounding content is kept.
const DROP_TAG_ONLY: &[&str] = &["form", "input"];

/// Attributes allowed to survive on kept tags.
const ALLOWED_ATTRS: &[&str] = &["href", "src", "alt", "title", "target", "class", "rel"];

/// Stateful raw-HTML fragment sanitizer.
///
/// The markdown parser hands raw HTML over in fragments (an element may
/// open in one fragment and close in a later one), so suppression of
/// `script`/`style`/`iframe` content has to carry across calls.
#[derive(Debug, Default)]
pub struct RawHtmlSanitizer {
    suppressing: Option<String>,
}

impl RawHtmlSanitizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sanitizes one raw-HTML fragment, carrying element-suppression state
    /// over from previous fragments.
    pub fn sanitize_fragment(&mut self, fragment: &str) -> String {
        let mut out = String::with_capacity(fragment.len());
        let mut rest = fragment;
        while !rest.is_empty() {
            let Some(idx) = rest.find('<') else {
                if self.suppressing.is_none() {
                    out.push_str(rest);
                }
                break;
            };
            let (text, tail) = rest.split_at(idx);
            if self.suppressing.is_none() {
                out.push_str(text);
            }
            match tail.find('>') {
                None => {
                    // dangling '<' with no closing '>': escape so it can
                    // never open an element downstream
                    if self.suppressing.is_none() {
                        out.push_str(&escape_html(tail));
                    }
                    break;
                }
                Some(end) => {
                    self.emit_tag(&tail[..=end], &mut out);
                    rest = &tail[end + 1..];
                }
            }
        }
        out
    }

    /// Whether the sanitizer is currently inside a dropped element.
    pub fn is_suppressing(&self) -> bool {
        self.suppressing.is_some()
    }

    fn emit_tag(&mut self, tag: &str, out: &mut String) {
        let inner = &tag[1..tag.len() - 1];

        // comments, doctypes, processing instructions
        if inner.starts_with('!') || inner.starts_with('?') {
            return;
        }

        let (closing, inner) = match inner.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (false, inner),
        };

        let name: String = inner
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
            .collect();
        if name.is_empty() {
            // not an element; render the text harmlessly
            if self.suppressing.is_none() {
                out.push_str(&escape_html(tag));
            }
            return;
        }
        let lname = name.to_ascii_lowercase();

        if let Some(active) = &self.suppressing {
            if closing && *active == lname {
                self.suppressing = None;
            }
            return;
        }

        if DROP_WITH_CONTENT.contains(&lname.as_str()) {
            let self_closing = inner.trim_end().ends_with('/');
            if !closing && !self_closing {
                self.suppressing = Some(lname);
            }
            return;
        }

        if DROP_TAG_ONLY.contains(&lname.as_str()) {
            return;
        }

        if closing {
            out.push_str("</");
            out.push_str(&lname);
            out.push('>');
            return;
        }

        out.push('<');
        out.push_str(&lname);
        for (attr, value) in parse_attrs(&inner[name.len()..]) {
            let aname = attr.to_ascii_lowercase();
            if aname == "style" || aname.starts_with("on") {
                continue;
            }
            if !ALLOWED_ATTRS.contains(&aname.as_str()) {
                continue;
            }
            if matches!(aname.as_str(), "href" | "src")
                && value
                    .as_deref()
                    .is_some_and(|v| v.trim().to_ascii_lowercase().starts_with("javascript:"))
            {
                continue;
            }
            out.push(' ');
            out.push_str(&aname);
            if let Some(v) = value {
                out.push_str("=\"");
                out.push_str(&escape_html(&v));
                out.push('"');
            }
        }
        if inner.trim_end().ends_with('/') {
            out.push_str(" /");
        }
        out.push('>');
    }
}

/// Parses the attribute section of an opening tag into name/value pairs.
///
/// Tolerant of unquoted, single-quoted, and valueless attributes; the
/// output is re-serialized with double quotes and escaped values.
fn parse_attrs(input: &str) -> Vec<(String, Option<String>)> {
    let mut attrs = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        while i < chars.len() && (chars[i].is_whitespace() || chars[i] == '/') {
            i += 1;
        }
        let start = i;
        while i < chars.len() && !chars[i].is_whitespace() && chars[i] != '=' && chars[i] != '/' {
            i += 1;
        }
        if i == start {
            break;
        }
        let name: String = chars[start..i].iter().collect();
        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
        if i < chars.len() && chars[i] == '=' {
            i += 1;
            while i < chars.len() && chars[i].is_whitespace() {
                i += 1;
            }
            let value: String = if i < chars.len() && (chars[i] == '"' || chars[i] == '\'') {
                let quote = chars[i];
                i += 1;
                let vstart = i;
                while i < chars.len() && chars[i] != quote {
                    i += 1;
                }
                let v = chars[vstart..i].iter().collect();
                if i < chars.len() {
                    i += 1;
                }
                v
            } else {
                let vstart = i;
                while i < chars.len() && !chars[i].is_whitespace() {
                    i += 1;
                }
                chars[vstart..i].iter().collect()
            };
            attrs.push((name, Some(value)));
        } else {
            attrs.push((name, None));
        }
    }
    attrs
}
