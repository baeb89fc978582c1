use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    routing::{get, post},
    Form, Router,
};
use tracing::instrument;

use crate::{
    auth::session::StaffSession,
    error::AppResult,
    state::AppState,
};

use super::dto::AddMealForm;
use super::{pages, services};

// --- public routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/", get(home))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/add_meal", post(add_meal))
        .route("/delete_meal/:id", post(delete_meal))
}

// --- handlers ---

#[instrument(skip(state))]
pub async fn home(
    State(state): State<AppState>,
    StaffSession(session_id): StaffSession,
) -> AppResult<Html<String>> {
    let items = services::list_meals_with_stats(&state).await?;
    Ok(pages::home(&items))
}

#[instrument(skip(state))]
pub async fn add_meal(
    State(state): State<AppState>,
    StaffSession(session_id): StaffSession,
    Form(form): Form<AddMealForm>,
) -> AppResult<Redirect> {
    services::create_meal_with_qr(&state, form.into()).await?;
    Ok(Redirect::to("/"))
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    StaffSession(session_id): StaffSession,
    Path(id): Path<i64>,
) -> AppResult<Redirect> {
    services::delete_meal_with_qr(&state, id).await?;
    Ok(Redirect::to("/"))
}
