use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

/// Failures surfaced to a browser. Anything that goes wrong in the store,
/// storage or QR rendering ends up as a plain 500 page.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::error!(error = %self, %status, "request failed");

        let reason = status.canonical_reason().unwrap_or("Error");
        let body = crate::html::page(
            reason,
            &format!(
                "<h2>{} {}</h2><p>Something went wrong. Please try again.</p>",
                status.as_u16(),
                reason
            ),
        );
        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
