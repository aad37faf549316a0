//! HTML preview of a conversation.
//!
//! Runs the core renderer over every message, wraps the result in a
//! standalone document, writes it to a temporary file, and opens it with
//! the platform opener. This is the end-to-end consumer of the sanitized
//! markup contract.

use minijinja::{Environment, context};
use natter_core::conversation::Message;
use natter_core::render::{escape_html, looks_like_literal_html, render_message};
use natter_core::{NatterError, Result};
use std::path::{Path, PathBuf};
use tracing::info;

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{ title }}</title>
<style>
body { font-family: sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; background: #fafafa; color: #222; }
h1 { font-size: 1.3rem; border-bottom: 1px solid #ddd; padding-bottom: .5rem; }
.message { margin: 1rem 0; padding: .75rem 1rem; border-radius: .5rem; }
.message.user { background: #e3f2fd; }
.message.assistant { background: #fff; border: 1px solid #e0e0e0; }
.message .role { font-weight: bold; font-size: .8rem; text-transform: uppercase; color: #777; margin-bottom: .25rem; }
.code-block { margin: .75rem 0; border: 1px solid #ddd; border-radius: .4rem; overflow: hidden; }
.code-block-header { display: flex; justify-content: space-between; background: #eee; padding: .25rem .75rem; font-size: .8rem; }
.code-block-header .copy-button { border: none; background: none; color: #555; cursor: default; }
.code-block pre { margin: 0; padding: .75rem; overflow-x: auto; background: #2b303b; color: #c0c5ce; }
.code-block code .keyword { color: #b48ead; }
.code-block code .string { color: #a3be8c; }
.code-block code .comment { color: #65737e; font-style: italic; }
.code-block code .constant { color: #d08770; }
.code-block code .entity { color: #8fa1b3; }
.code-block code .storage { color: #b48ead; }
.code-block code .support { color: #96b5b4; }
table { border-collapse: collapse; }
td, th { border: 1px solid #ccc; padding: .3rem .6rem; }
.footer { margin-top: 2rem; font-size: .75rem; color: #999; }
</style>
</head>
<body>
<h1>{{ title }}</h1>
{{ body }}
<div class="footer">Exported {{ generated }}</div>
</body>
</html>
"#;

/// Renders the conversation to a standalone HTML file under the system
/// temp directory and returns its path.
pub fn export_conversation(title: &str, messages: &[Message]) -> Result<PathBuf> {
    export_conversation_to(&std::env::temp_dir(), title, messages)
}

fn export_conversation_to(dir: &Path, title: &str, messages: &[Message]) -> Result<PathBuf> {
    let mut body = String::new();
    for message in messages {
        let literal = looks_like_literal_html(&message.content);
        body.push_str(&format!(
            "<div class=\"message {role}\"><div class=\"role\">{role}</div>\
<div class=\"markdown-content\">{content}</div></div>\n",
            role = message.role,
            content = render_message(&message.content, literal),
        ));
    }

    let env = Environment::new();
    let template = env
        .template_from_str(TEMPLATE)
        .map_err(|err| NatterError::internal(format!("preview template: {err}")))?;
    let html = template
        .render(context! {
            title => escape_html(title),
            body => body,
            generated => chrono::Local::now().format("%Y-%m-%d %H:%M").to_string(),
        })
        .map_err(|err| NatterError::internal(format!("preview render: {err}")))?;

    let path = dir.join(format!(
        "natter_preview_{}.html",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    ));
    std::fs::write(&path, html)?;
    info!(path = %path.display(), "wrote conversation preview");
    Ok(path)
}

/// Opens `path` with the platform's default handler.
pub fn open_in_browser(path: &Path) -> Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        let mut c = std::process::Command::new("open");
        c.arg(path);
        c
    } else if cfg!(target_os = "windows") {
        let mut c = std::process::Command::new("cmd");
        c.args(["/C", "start", ""]).arg(path);
        c
    } else {
        let mut c = std::process::Command::new("xdg-open");
        c.arg(path);
        c
    };
    command
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map_err(|err| NatterError::internal(format!("could not open preview: {err}")))?;
    Ok(())
}

/// Exports and opens in one step; used by the preview command.
pub fn export_and_open(title: &str, messages: &[Message]) -> Result<PathBuf> {
    let path = export_conversation(title, messages)?;
    open_in_browser(&path)?;
    Ok(path)
}
