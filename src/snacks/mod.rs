pub mod handlers;
mod pages;

use anyhow::Context;
use axum::Router;
use tracing::info;

use crate::{qr, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::public_routes())
        .merge(handlers::staff_routes())
}

/// (Re)writes the QR image pointing at the public snack form.
pub async fn ensure_snack_form_qr(st: &AppState) -> anyhow::Result<()> {
    let url = qr::snack_form_url(&st.config.public_base_url);
    let png = qr::render_png(&url)?;
    st.storage
        .put_object(qr::SNACK_FORM_QR, png, "image/png")
        .await
        .context("store snack form qr")?;
    info!(%url, key = qr::SNACK_FORM_QR, "snack form qr ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn snack_form_qr_is_written() {
        let (state, storage) = AppState::fake().await;
        ensure_snack_form_qr(&state).await.unwrap();
        assert!(storage.get(qr::SNACK_FORM_QR).is_some());
    }
}
