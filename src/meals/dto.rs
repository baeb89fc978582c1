use serde::Deserialize;

use crate::repo::{Meal, NewMeal};
use crate::reviews::stats::MealStats;

/// Fields of the add-meal form on the home page.
#[derive(Debug, Deserialize)]
pub struct AddMealForm {
    #[serde(rename = "mealName")]
    pub name: String,
    #[serde(rename = "mealType")]
    pub meal_type: String,
    #[serde(rename = "mealDate")]
    pub date: String,
}

impl From<AddMealForm> for NewMeal {
    fn from(f: AddMealForm) -> Self {
        Self {
            name: f.name,
            meal_type: f.meal_type,
            date: f.date,
        }
    }
}

/// One row of the meal table on the home page.
#[derive(Debug)]
pub struct MealListItem {
    pub meal: Meal,
    pub stats: Option<MealStats>,
    pub qr_url: Option<String>,
}
