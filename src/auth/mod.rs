use crate::state::AppState;
use axum::Router;

pub mod handlers;
mod pages;
pub mod password;
pub mod session;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::auth_routes())
}
