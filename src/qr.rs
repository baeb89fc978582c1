use std::io::Cursor;

use anyhow::Context;
use bytes::Bytes;
use image::{ImageFormat, Luma};
use lazy_static::lazy_static;
use qrcode::QrCode;
use regex::Regex;

/// Storage key of the QR code pointing at the public snack form.
pub const SNACK_FORM_QR: &str = "qr_snack_form.png";

lazy_static! {
    static ref NON_FILENAME_CHARS: Regex = Regex::new(r"[^a-zA-Z0-9_]").unwrap();
}

/// Spaces become underscores, everything outside `[A-Za-z0-9_]` is dropped,
/// then the result is lowercased.
pub fn sanitize_filename(text: &str) -> String {
    NON_FILENAME_CHARS
        .replace_all(&text.replace(' ', "_"), "")
        .to_lowercase()
}

/// Only the name is sanitized; the date goes in as submitted.
pub fn meal_qr_filename(meal_name: &str, meal_date: &str) -> String {
    format!("qr_{}_{}.png", sanitize_filename(meal_name), meal_date)
}

pub fn meal_form_url(base_url: &str, meal_id: i64) -> String {
    format!("{}/form/{}", base_url.trim_end_matches('/'), meal_id)
}

pub fn snack_form_url(base_url: &str) -> String {
    format!("{}/snack_form", base_url.trim_end_matches('/'))
}

/// Encodes `url` as a grayscale PNG.
pub fn render_png(url: &str) -> anyhow::Result<Bytes> {
    let code = QrCode::new(url.as_bytes()).context("encode qr code")?;
    let img = code.render::<Luma<u8>>().min_dimensions(256, 256).build();

    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .context("write qr png")?;
    Ok(Bytes::from(buf.into_inner()))
}
