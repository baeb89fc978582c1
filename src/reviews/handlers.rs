use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    routing::{get, post},
    Form, Router,
};
use tracing::{info, instrument};

use crate::{auth::session::StaffSession, error::AppResult, state::AppState};

use super::dto::{DeleteSuggestionForm, ReviewForm};
use super::{pages, stats};

/// Reachable from the QR codes without logging in.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/form/:id", get(feedback_form))
        .route("/submit_review/:id", post(submit_review))
}

pub fn staff_routes() -> Router<AppState> {
    Router::new()
        .route("/comments", get(comments))
        .route("/delete_comment/:id", post(delete_comment))
        .route("/recommended", get(recommended))
        .route("/delete_suggestion", post(delete_suggestion))
}

#[instrument(skip(state))]
pub async fn feedback_form(
    State(state): State<AppState>,
    Path(meal_id): Path<i64>,
) -> AppResult<Html<String>> {
    let meal = state.repo.get_meal(meal_id).await?;
    Ok(pages::feedback_form(meal_id, meal.as_ref()))
}

#[instrument(skip(state))]
pub async fn submit_review(
    State(state): State<AppState>,
    Path(meal_id): Path<i64>,
    Form(form): Form<ReviewForm>,
) -> AppResult<Html<&'static str>> {
    let review = state.repo.insert_review(&form.into_review(meal_id)).await?;
    info!(review_id = review.id, meal_id, rating = ?review.rating, "review submitted");
    Ok(Html(pages::REVIEW_THANKS))
}

#[instrument(skip(state))]
pub async fn comments(
    State(state): State<AppState>,
    StaffSession(session_id): StaffSession,
) -> AppResult<Html<String>> {
    let rows = state.repo.list_commented_reviews().await?;
    Ok(pages::comments(&stats::group_comments(rows)))
}

#[instrument(skip(state))]
pub async fn delete_comment(
    State(state): State<AppState>,
    StaffSession(session_id): StaffSession,
    Path(id): Path<i64>,
) -> AppResult<Redirect> {
    let deleted = state.repo.delete_review_by_id(id).await?;
    info!(review_id = id, deleted, "comment deleted");
    Ok(Redirect::to("/comments"))
}

#[instrument(skip(state))]
pub async fn recommended(
    State(state): State<AppState>,
    StaffSession(session_id): StaffSession,
) -> AppResult<Html<String>> {
    let ranked = state.repo.rank_suggestions().await?;
    Ok(pages::recommended(&ranked))
}

#[instrument(skip(state))]
pub async fn delete_suggestion(
    State(state): State<AppState>,
    StaffSession(session_id): StaffSession,
    Form(form): Form<DeleteSuggestionForm>,
) -> AppResult<Redirect> {
    let deleted = state
        .repo
        .delete_reviews_by_suggestion(&form.suggestion)
        .await?;
    info!(suggestion = %form.suggestion, deleted, "suggestion deleted");
    Ok(Redirect::to("/recommended"))
}
