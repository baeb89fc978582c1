use axum::response::Html;

use crate::html::{escape, page};

pub fn login(error: Option<&str>) -> Html<String> {
    let error = error
        .map(|e| format!("<p class=\"error\">{}</p>", escape(e)))
        .unwrap_or_default();
    page(
        "Staff login",
        &format!(
            "<h1>Staff login</h1>{error}\
             <form method=\"post\" action=\"/login\">\
             <label>Password <input type=\"password\" name=\"password\" autofocus required></label> \
             <button type=\"submit\">Log in</button></form>"
        ),
    )
}
