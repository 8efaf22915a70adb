// src/views/layout.rs
// DOCUMENTATION: Shared page chrome and HTML helpers
// PURPOSE: Escaping, script-safe JSON, flash message rendering, error pages

use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::forms::FormErrors;
use crate::models::User;

/// Severity of a one-shot message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Success,
    Error,
}

/// Notice shown once at the top of a page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlashMessage {
    pub level: MessageLevel,
    pub text: String,
}

impl FlashMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            text: text.into(),
        }
    }
}

/// Per-request data every page needs
#[derive(Debug, Clone, Default)]
pub struct PageFrame<'a> {
    pub user: Option<&'a User>,
    pub messages: Vec<FlashMessage>,
}

impl<'a> PageFrame<'a> {
    pub fn new(user: Option<&'a User>, messages: Vec<FlashMessage>) -> Self {
        Self { user, messages }
    }

    /// Add a message raised while handling this request
    pub fn with_message(mut self, message: FlashMessage) -> Self {
        self.messages.push(message);
        self
    }
}

/// Escape HTML special characters.
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// JSON that can sit inside a <script> element
/// DOCUMENTATION: "</" is written as "<\/" so a value cannot close the element
pub fn json_for_script<T: Serialize + ?Sized>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json.replace("</", "<\\/"),
        Err(e) => {
            log::error!("Failed to serialize page data: {}", e);
            "null".to_string()
        }
    }
}

/// <ul class="errorlist"> for one field, empty when the field is clean
pub fn field_errors(errors: &FormErrors, field: &str) -> String {
    error_list(errors.field(field))
}

pub fn non_field_errors(errors: &FormErrors) -> String {
    error_list(errors.non_field())
}

fn error_list(messages: &[String]) -> String {
    if messages.is_empty() {
        return String::new();
    }
    let items: String = messages
        .iter()
        .map(|m| format!("<li>{}</li>", escape(m)))
        .collect();
    format!(r#"<ul class="errorlist">{}</ul>"#, items)
}

fn render_messages(messages: &[FlashMessage]) -> String {
    if messages.is_empty() {
        return String::new();
    }
    let items: String = messages
        .iter()
        .map(|m| {
            let class = match m.level {
                MessageLevel::Success => "success",
                MessageLevel::Error => "error",
            };
            format!(r#"<li class="{}">{}</li>"#, class, escape(&m.text))
        })
        .collect();
    format!(r#"<ul class="messages">{}</ul>"#, items)
}

fn render_nav(user: Option<&User>) -> String {
    match user {
        Some(user) => format!(
            r#"<a href="/">My themes</a> <a href="/theme/create/">New theme</a> <span class="user">{}</span> <a href="/accounts/logout/">Log out</a>"#,
            escape(&user.username)
        ),
        None => r#"<a href="/accounts/login/">Log in</a> <a href="/signup/">Sign up</a>"#.to_string(),
    }
}

/// Wrap `body` in the site chrome
/// DOCUMENTATION: `head` is inserted verbatim into <head>; callers escape it
pub fn page(frame: &PageFrame, title: &str, head: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} | Photo Map Journal</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.5; color: #333; max-width: 960px; margin: 0 auto; padding: 20px; }}
        nav a, nav span {{ margin-right: 12px; }}
        .messages .success {{ color: #1e7e34; }}
        .messages .error, .errorlist {{ color: #c82333; }}
        .photo img {{ max-width: 240px; }}
        #map {{ height: 480px; width: 100%; }}
    </style>
    {head}
</head>
<body>
    <nav>{nav}</nav>
    {messages}
    <main>
{body}
    </main>
</body>
</html>"#,
        title = escape(title),
        head = head,
        nav = render_nav(frame.user),
        messages = render_messages(&frame.messages),
        body = body,
    )
}

/// Minimal page for error responses
pub fn error_page(status: StatusCode, message: &str) -> String {
    let title = format!(
        "{} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Error")
    );
    let body = format!("<h1>{}</h1>\n<p>{}</p>", escape(&title), escape(message));
    page(&PageFrame::default(), &title, "", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_json_for_script_cannot_close_tag() {
        let json = json_for_script(&vec!["</script><script>alert(1)"]);
        assert!(!json.contains("</script>"));
        assert_eq!(json, r#"["<\/script><script>alert(1)"]"#);
    }

    #[test]
    fn test_field_errors_render_escaped() {
        let mut errors = FormErrors::new();
        errors.add("name", "Bad <name>");
        assert_eq!(
            field_errors(&errors, "name"),
            r#"<ul class="errorlist"><li>Bad &lt;name&gt;</li></ul>"#
        );
        assert_eq!(field_errors(&errors, "latitude"), "");
    }

    #[test]
    fn test_page_shows_messages_and_user() {
        let frame = PageFrame::default().with_message(FlashMessage::success("Saved."));
        let html = page(&frame, "Home", "", "<p>hi</p>");
        assert!(html.contains(r#"<li class="success">Saved.</li>"#));
        assert!(html.contains("<title>Home | Photo Map Journal</title>"));
        assert!(html.contains("Log in"));
    }

    #[test]
    fn test_error_page() {
        let html = error_page(StatusCode::FORBIDDEN, "You don't have permission to edit this location.");
        assert!(html.contains("403 Forbidden"));
        assert!(html.contains("You don&#x27;t have permission to edit this location."));
    }
}
