use axum::{
    extract::{FromRef, State},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::{
    auth::{pages, session::SessionKeys},
    error::AppResult,
    state::AppState,
};

pub const LOGIN_FAILED: &str = "Incorrect password. Please try again.";

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub password: String,
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
}

pub async fn login_page() -> Html<String> {
    pages::login(None)
}

#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    if !state.password.check(&form.password)? {
        warn!("login with wrong password");
        return Ok(pages::login(Some(LOGIN_FAILED)).into_response());
    }

    let keys = SessionKeys::from_ref(&state);
    let (session_id, token) = keys.sign()?;
    info!(%session_id, "staff logged in");
    Ok((
        [(header::SET_COOKIE, keys.login_cookie(&token))],
        Redirect::to("/"),
    )
        .into_response())
}

pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let keys = SessionKeys::from_ref(&state);
    (
        [(header::SET_COOKIE, keys.logout_cookie())],
        Redirect::to("/login"),
    )
}
