use std::fmt::Write;

use axum::response::Html;

use crate::html::{escape, page, post_button, staff_page};
use crate::repo::Meal;

use super::stats::{CommentGroup, SuggestionCount};

pub const REVIEW_THANKS: &str =
    "<h2>Thank you for your feedback!</h2><p>You can now close this page.</p>";

pub fn feedback_form(meal_id: i64, meal: Option<&Meal>) -> Html<String> {
    let heading = match meal {
        Some(m) => format!("How was the {}?", escape(&m.name)),
        None => "How was your meal?".to_string(),
    };
    let mut stars = String::new();
    for n in (1..=5).rev() {
        let _ = write!(
            stars,
            "<label><input type=\"radio\" name=\"rating\" value=\"{n}\"> {n}</label> "
        );
    }
    page(
        "Meal feedback",
        &format!(
            "<h1>{heading}</h1><form method=\"post\" action=\"/submit_review/{meal_id}\">\
             <p>{stars}</p>\
             <p><label>Comment<br><input name=\"comment\" maxlength=\"40\"></label></p>\
             <p><label>What should we cook next?<br><input name=\"suggestion\" maxlength=\"20\"></label></p>\
             <button type=\"submit\">Send</button></form>"
        ),
    )
}

pub fn comments(groups: &[CommentGroup]) -> Html<String> {
    if groups.is_empty() {
        return staff_page("Comments", "<p>No comments yet.</p>");
    }
    let mut body = String::new();
    for group in groups {
        let _ = write!(body, "<h2>{}</h2><ul>", escape(&group.meal_name));
        for c in &group.comments {
            let _ = write!(
                body,
                "<li>{} {}</li>",
                escape(&c.comment),
                post_button(&format!("/delete_comment/{}", c.id), "Delete", &[])
            );
        }
        body.push_str("</ul>");
    }
    staff_page("Comments", &body)
}

pub fn recommended(ranked: &[SuggestionCount]) -> Html<String> {
    if ranked.is_empty() {
        return staff_page("Recommended meals", "<p>No suggestions yet.</p>");
    }
    let mut body = String::from("<table><tr><th>Suggestion</th><th>Count</th><th></th></tr>");
    for s in ranked {
        let _ = write!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&s.suggestion),
            s.count,
            post_button("/delete_suggestion", "Delete", &[("suggestion", s.suggestion.as_str())])
        );
    }
    body.push_str("</table>");
    staff_page("Recommended meals", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reviews::stats::CommentEntry;

    #[test]
    fn form_posts_back_to_its_meal() {
        let Html(html) = feedback_form(12, None);
        assert!(html.contains("action=\"/submit_review/12\""));
        assert!(html.contains("name=\"rating\" value=\"5\""));
        assert!(html.contains("How was your meal?"));
    }

    #[test]
    fn comments_render_grouped_with_delete_buttons() {
        let Html(html) = comments(&[CommentGroup {
            meal_name: "Curry".into(),
            comments: vec![CommentEntry {
                id: 4,
                comment: "a bit <hot>".into(),
            }],
        }]);
        assert!(html.contains("<h2>Curry</h2>"));
        assert!(html.contains("a bit &lt;hot&gt;"));
        assert!(html.contains("action=\"/delete_comment/4\""));
    }

    #[test]
    fn recommended_posts_back_the_ranked_text() {
        let Html(html) = recommended(&[
            SuggestionCount {
                suggestion: "éclair".into(),
                count: 2,
            },
            SuggestionCount {
                suggestion: "fish & chips".into(),
                count: 1,
            },
        ]);
        assert!(html.contains("<td>éclair</td><td>2</td>"));
        assert!(html.contains("<input type=\"hidden\" name=\"suggestion\" value=\"éclair\">"));
        assert!(html.contains("value=\"fish &amp; chips\""));
        assert_eq!(html.matches("action=\"/delete_suggestion\"").count(), 2);
    }
}
