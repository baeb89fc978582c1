use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// One served dish.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct Meal {
    pub id: i64,
    pub name: String,
    #[sqlx(rename = "type")]
    pub meal_type: String,
    pub date: String,            // stored as submitted, e.g. 2024-05-01
    pub qr_code: Option<String>, // storage key, set after the image is written
}

#[derive(Debug, Clone)]
pub struct NewMeal {
    pub name: String,
    pub meal_type: String,
    pub date: String,
}

/// Guest feedback tied to a meal.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct Review {
    pub id: i64,
    pub meal_id: i64,
    pub rating: Option<i32>,
    pub comment: Option<String>,
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewReview {
    pub meal_id: i64,
    pub rating: Option<i32>,
    pub comment: Option<String>,
    pub suggestion: Option<String>,
}

/// A review with a non-empty comment, joined with its meal.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct CommentedReview {
    pub id: i64,
    pub comment: String,
    pub meal_name: String,
    pub meal_date: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Snack {
    pub id: i64,
    pub suggestion: String,
    pub created_at: OffsetDateTime,
}
