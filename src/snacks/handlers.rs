use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::{auth::session::StaffSession, error::AppResult, qr, state::AppState};

use super::pages;

#[derive(Debug, Deserialize)]
pub struct SnackForm {
    pub snack: String,
}

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/snack_form", get(snack_form))
        .route("/submit_snack", post(submit_snack))
}

pub fn staff_routes() -> Router<AppState> {
    Router::new()
        .route("/snacks", get(list_snacks))
        .route("/delete_snack/:id", post(delete_snack))
}

pub async fn snack_form() -> Html<String> {
    pages::snack_form()
}

#[instrument(skip(state))]
pub async fn submit_snack(
    State(state): State<AppState>,
    Form(form): Form<SnackForm>,
) -> AppResult<Html<&'static str>> {
    let snack = state.repo.insert_snack(&form.snack).await?;
    info!(snack_id = snack.id, "snack suggested");
    Ok(Html(pages::SNACK_THANKS))
}

#[instrument(skip(state))]
pub async fn list_snacks(
    State(state): State<AppState>,
    StaffSession(session_id): StaffSession,
) -> AppResult<Html<String>> {
    let snacks = state.repo.list_snacks().await?;
    let qr_url = state.storage.public_url(qr::SNACK_FORM_QR).await?;
    Ok(pages::snacks(&snacks, &qr_url))
}

#[instrument(skip(state))]
pub async fn delete_snack(
    State(state): State<AppState>,
    StaffSession(session_id): StaffSession,
    Path(id): Path<i64>,
) -> AppResult<Redirect> {
    let deleted = state.repo.delete_snack_by_id(id).await?;
    info!(snack_id = id, deleted, "snack deleted");
    Ok(Redirect::to("/snacks"))
}
