//! Escaping for text placed into HTML bodies and attribute values.

use std::fmt::Write;

/// Escape `text` so it renders literally inside element content or a
/// double- or single-quoted attribute.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// A full HTML document around `body`.
pub fn document(title: &str, body: &str) -> String {
    let mut page = String::new();
    let _ = write!(
        page,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n</head>\n<body>\n\
         <header class=\"site-header\"><h1><a href=\"/\">{title}</a></h1></header>\n\
         <main class=\"site-main\">\n{body}</main>\n</body>\n</html>\n",
        title = escape(title),
    );
    page
}
