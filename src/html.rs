//! Shared page chrome for the server-rendered views.

use axum::response::Html;

const STYLE: &str = "body{font-family:sans-serif;max-width:52rem;margin:2rem auto;padding:0 1rem}\
table{border-collapse:collapse;width:100%}td,th{border-bottom:1px solid #ddd;padding:.4rem;text-align:left}\
nav a{margin-right:1rem}.error{color:#b00}form.inline{display:inline}img.qr{width:96px}";

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `title` is escaped, `body` is inserted as is.
pub fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{}</title><style>{STYLE}</style></head><body>{body}</body></html>",
        escape(title)
    ))
}

/// Page with the staff navigation bar on top.
pub fn staff_page(title: &str, body: &str) -> Html<String> {
    page(
        title,
        &format!(
            "<nav><a href=\"/\">Meals</a><a href=\"/comments\">Comments</a>\
             <a href=\"/recommended\">Recommended</a><a href=\"/snacks\">Snacks</a>\
             <a href=\"/logout\">Log out</a></nav><h1>{}</h1>{body}",
            escape(title)
        ),
    )
}

/// Small POST form with a single button, used for the delete actions.
pub fn post_button(action: &str, label: &str, hidden: &[(&str, &str)]) -> String {
    let mut fields = String::new();
    for (name, value) in hidden {
        fields.push_str(&format!(
            "<input type=\"hidden\" name=\"{}\" value=\"{}\">",
            escape(name),
            escape(value)
        ));
    }
    format!(
        "<form class=\"inline\" method=\"post\" action=\"{}\">{fields}<button type=\"submit\">{}</button></form>",
        escape(action),
        escape(label)
    )
}
