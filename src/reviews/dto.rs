use serde::Deserialize;
use tracing::debug;

use crate::repo::NewReview;

/// Public feedback form. Every field is optional.
#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    pub rating: Option<String>,
    pub comment: Option<String>,
    pub suggestion: Option<String>,
}

impl ReviewForm {
    pub fn into_review(self, meal_id: i64) -> NewReview {
        NewReview {
            meal_id,
            rating: parse_rating(self.rating.as_deref()),
            comment: self.comment,
            suggestion: self.suggestion,
        }
    }
}

/// Empty or non-numeric ratings are stored as "no rating". The range is
/// not checked.
fn parse_rating(raw: Option<&str>) -> Option<i32> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<i32>() {
        Ok(v) => Some(v),
        Err(_) => {
            debug!(rating = raw, "ignoring non-numeric rating");
            None
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteSuggestionForm {
    pub suggestion: String,
}
