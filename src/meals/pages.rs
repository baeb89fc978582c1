use std::fmt::Write;

use axum::response::Html;

use crate::html::{escape, post_button, staff_page};

use super::dto::MealListItem;

const MEAL_TYPES: [&str; 4] = ["Breakfast", "Lunch", "Dinner", "Snack"];

pub fn home(items: &[MealListItem]) -> Html<String> {
    let mut body = String::from(
        "<h2>Add a meal</h2><form method=\"post\" action=\"/add_meal\">\
         <label>Name <input name=\"mealName\" required></label> \
         <label>Type <select name=\"mealType\">",
    );
    for t in MEAL_TYPES {
        let _ = write!(body, "<option>{t}</option>");
    }
    body.push_str(
        "</select></label> <label>Date <input type=\"date\" name=\"mealDate\" required></label> \
         <button type=\"submit\">Add</button></form><h2>Meals</h2>",
    );

    if items.is_empty() {
        body.push_str("<p>No meals yet.</p>");
        return staff_page("Kitchen meals", &body);
    }

    body.push_str(
        "<table><tr><th>Date</th><th>Meal</th><th>Type</th><th>Rating</th>\
         <th>Reviews</th><th>QR</th><th></th></tr>",
    );
    for item in items {
        let meal = &item.meal;
        let (rating, count) = match item.stats {
            Some(s) => (format!("{:.2}", s.average_rating), s.review_count.to_string()),
            None => ("-".to_string(), "0".to_string()),
        };
        let qr = item
            .qr_url
            .as_deref()
            .map(|url| {
                format!(
                    "<a href=\"{0}\" download><img class=\"qr\" src=\"{0}\" alt=\"QR\"></a>",
                    escape(url)
                )
            })
            .unwrap_or_default();
        let _ = write!(
            body,
            "<tr><td>{}</td><td><a href=\"/form/{}\">{}</a></td><td>{}</td><td>{rating}</td>\
             <td>{count}</td><td>{qr}</td><td>{}</td></tr>",
            escape(&meal.date),
            meal.id,
            escape(&meal.name),
            escape(&meal.meal_type),
            post_button(&format!("/delete_meal/{}", meal.id), "Delete", &[]),
        );
    }
    body.push_str("</table>");
    staff_page("Kitchen meals", &body)
}
