//! HTML pages for the web interface.
//!
//! Plain `format!` templates. Every user-supplied string goes through [`html_escape`].

use axum::http::StatusCode;
use journal_common::Entry;

use crate::router::{ADD_ENTRY_PATH, LOGIN_PATH, LOGOUT_PATH, REGISTER_PATH};

const STYLES: &str = r#"
    body {
        font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Arial, sans-serif;
        max-width: 720px;
        margin: 40px auto;
        padding: 0 20px;
        background: #f5f5f5;
        color: #333;
    }
    .container { background: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
    h1 { border-bottom: 2px solid #0066cc; padding-bottom: 10px; }
    .error { background: #fdecea; color: #b00020; padding: 10px; border-radius: 4px; margin: 10px 0; }
    .notice { background: #e8f4fd; color: #0b5394; padding: 10px; border-radius: 4px; margin: 10px 0; }
    label { display: block; font-weight: bold; margin: 10px 0 5px; }
    input[type="text"], input[type="password"], textarea {
        width: 100%; padding: 10px; border: 1px solid #ddd; border-radius: 4px; box-sizing: border-box;
    }
    textarea { resize: vertical; min-height: 100px; }
    button { background: #0066cc; color: white; padding: 10px 20px; border: none; border-radius: 4px; margin-top: 10px; cursor: pointer; }
    .entry { border-top: 1px solid #eee; padding: 12px 0; white-space: pre-wrap; }
    .meta { color: #888; font-size: 12px; }
    .nav { float: right; font-size: 14px; }
"#;

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>{STYLES}</style>
</head>
<body>
<div class="container">
{body}
</div>
</body>
</html>"#,
        title = html_escape(title),
    )
}

fn message_block(class: &str, message: Option<&str>) -> String {
    message
        .map(|m| format!(r#"<div class="{class}">{}</div>"#, html_escape(m)))
        .unwrap_or_default()
}

pub fn login_page(error: Option<&str>, notice: Option<&str>) -> String {
    let body = format!(
        r#"<h1>Log in</h1>
{notice}{error}
<form method="post" action="{LOGIN_PATH}">
  <label for="username">Username</label>
  <input type="text" id="username" name="username" required autofocus>
  <label for="password">Password</label>
  <input type="password" id="password" name="password" required>
  <button type="submit">Log in</button>
</form>
<p>No account? <a href="{REGISTER_PATH}">Register</a></p>"#,
        notice = message_block("notice", notice),
        error = message_block("error", error),
    );
    layout("Log in", &body)
}

pub fn register_page(error: Option<&str>) -> String {
    let body = format!(
        r#"<h1>Register</h1>
{error}
<form method="post" action="{REGISTER_PATH}">
  <label for="username">Username</label>
  <input type="text" id="username" name="username" maxlength="{max}" required autofocus>
  <label for="password">Password</label>
  <input type="password" id="password" name="password" required>
  <button type="submit">Create account</button>
</form>
<p>Already registered? <a href="{LOGIN_PATH}">Log in</a></p>"#,
        error = message_block("error", error),
        max = journal_common::MAX_USERNAME_LEN,
    );
    layout("Register", &body)
}

/// The caller's journal. `entries` must already be newest first.
pub fn journal_page(username: &str, entries: &[Entry], error: Option<&str>) -> String {
    let list = if entries.is_empty() {
        r#"<p class="meta">No entries yet.</p>"#.to_string()
    } else {
        entries
            .iter()
            .map(|entry| {
                format!(
                    r#"<div class="entry"><div class="meta">{}</div>{}</div>"#,
                    entry.created_at.format("%Y-%m-%d %H:%M UTC"),
                    html_escape(&entry.content),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let body = format!(
        r#"<div class="nav">{username} · <a href="{LOGOUT_PATH}">Log out</a></div>
<h1>Journal</h1>
{error}
<form method="post" action="{ADD_ENTRY_PATH}">
  <label for="content">New entry</label>
  <textarea id="content" name="content" required></textarea>
  <button type="submit">Add</button>
</form>
{list}"#,
        username = html_escape(username),
        error = message_block("error", error),
    );
    layout("Journal", &body)
}

pub fn error_page(status: StatusCode, code: &str, message: &str) -> String {
    let body = format!(
        r#"<h1>{status}</h1>
<div class="error">{message}</div>
<p class="meta">{code}</p>"#,
        status = html_escape(&status.to_string()),
        message = html_escape(message),
        code = html_escape(code),
    );
    layout("Error", &body)
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}
