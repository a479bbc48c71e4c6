use std::sync::Arc;

use anyhow::Context;

use crate::{assets::store::PreparedImage, foundation::error::ReelResult};

/// Decode encoded image bytes into straight-alpha RGBA8.
pub fn decode_image(bytes: &[u8]) -> ReelResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(PreparedImage {
        width,
        height,
        rgba8: Arc::new(rgba.into_raw()),
    })
}

/// Re-encode arbitrary decodable image bytes as PNG.
///
/// Generative services accept a narrow set of input formats; reference and
/// avatar images in other formats are normalized through this before
/// submission. Bytes that already are PNG pass through unchanged.
pub fn normalize_to_png(bytes: &[u8]) -> ReelResult<Vec<u8>> {
    if image::guess_format(bytes).ok() == Some(image::ImageFormat::Png) {
        return Ok(bytes.to_vec());
    }
    let dyn_img = image::load_from_memory(bytes).context("decode image for normalization")?;
    let mut out = std::io::Cursor::new(Vec::new());
    dyn_img
        .write_to(&mut out, image::ImageFormat::Png)
        .context("re-encode image as png")?;
    Ok(out.into_inner())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
