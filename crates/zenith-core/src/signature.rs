//! Signature image payloads
//!
//! Signatures are carried as `data:image/png;base64,...` URIs so the
//! browser can show them directly and the exporter can embed them.

use crate::error::EditorError;
use base64::{engine::general_purpose::STANDARD, Engine};

const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";
const PLACEHOLDER_WIDTH: u32 = 200;
const PLACEHOLDER_HEIGHT: u32 = 80;
const INK: [u8; 4] = [0, 0, 255, 255];

/// Wrap PNG bytes as a data URI.
pub fn to_data_uri(png: &[u8]) -> String {
    format!("{}{}", PNG_DATA_URI_PREFIX, STANDARD.encode(png))
}

/// Decode a data URI (or bare base64) back to the raw image bytes.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, EditorError> {
    let payload = match uri.split_once(',') {
        Some((header, data)) if header.starts_with("data:") => data,
        _ => uri,
    };
    STANDARD
        .decode(payload.trim())
        .map_err(|e| EditorError::ImageError(e.to_string()))
}

/// Generated stand-in signature: a blue flourish with an underline on a
/// transparent background.
pub fn placeholder_png() -> Result<Vec<u8>, EditorError> {
    let (w, h) = (PLACEHOLDER_WIDTH as usize, PLACEHOLDER_HEIGHT as usize);
    let mut pixels = vec![0u8; w * h * 4];

    let mut stamp = |cx: f64, cy: f64| {
        for dy in -1..=1 {
            for dx in -1..=1 {
                let x = cx.round() as i64 + dx;
                let y = cy.round() as i64 + dy;
                if x >= 0 && y >= 0 && (x as usize) < w && (y as usize) < h {
                    let i = (y as usize * w + x as usize) * 4;
                    pixels[i..i + 4].copy_from_slice(&INK);
                }
            }
        }
    };

    for step in 0..=640 {
        let t = f64::from(step) / 4.0;
        let x = 20.0 + t;
        let fade = 1.0 - t / 200.0;
        let y = 40.0 - 16.0 * (t / 9.0).sin() * fade;
        stamp(x, y);
    }
    for x in 20..180 {
        stamp(f64::from(x), 62.0);
    }

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| EditorError::ImageError(e.to_string()))?;
        writer
            .write_image_data(&pixels)
            .map_err(|e| EditorError::ImageError(e.to_string()))?;
    }
    Ok(out)
}

pub fn placeholder_data_uri() -> Result<String, EditorError> {
    placeholder_png().map(|png| to_data_uri(&png))
}
