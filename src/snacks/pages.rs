use std::fmt::Write;

use axum::response::Html;
use time::macros::format_description;

use crate::html::{escape, page, post_button, staff_page};
use crate::repo::Snack;

pub const SNACK_THANKS: &str =
    "<h2>Thank you for your snack suggestion!</h2><p>You can now close this page.</p>";

pub fn snack_form() -> Html<String> {
    page(
        "Snack suggestion",
        "<h1>Which snack would you like to see?</h1>\
         <form method=\"post\" action=\"/submit_snack\">\
         <input name=\"snack\" maxlength=\"100\" required> \
         <button type=\"submit\">Send</button></form>",
    )
}

pub fn snacks(snacks: &[Snack], qr_url: &str) -> Html<String> {
    let mut body = format!(
        "<p><a href=\"{0}\" download><img class=\"qr\" src=\"{0}\" alt=\"Snack form QR\"></a> \
         Scan to suggest a snack.</p>",
        escape(qr_url)
    );
    if snacks.is_empty() {
        body.push_str("<p>No snack suggestions yet.</p>");
        return staff_page("Snack suggestions", &body);
    }

    let fmt = format_description!("[year]-[month]-[day] [hour]:[minute]");
    body.push_str("<table><tr><th>Suggested</th><th>Snack</th><th></th></tr>");
    for snack in snacks {
        let when = snack.created_at.format(&fmt).unwrap_or_default();
        let _ = write!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            when,
            escape(&snack.suggestion),
            post_button(&format!("/delete_snack/{}", snack.id), "Delete", &[])
        );
    }
    body.push_str("</table>");
    staff_page("Snack suggestions", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn lists_snacks_with_timestamps() {
        let Html(html) = snacks(
            &[Snack {
                id: 5,
                suggestion: "Crisps & dip".into(),
                created_at: datetime!(2024-05-01 12:30 UTC),
            }],
            "/static/qr_snack_form.png",
        );
        assert!(html.contains("<td>2024-05-01 12:30</td>"));
        assert!(html.contains("Crisps &amp; dip"));
        assert!(html.contains("action=\"/delete_snack/5\""));
        assert!(html.contains("/static/qr_snack_form.png"));
    }
}
