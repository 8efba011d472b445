//! The edit rendering pipeline.
//!
//! `render` rasterizes an original image plus an [`EditSpec`] into an
//! encoded JPEG: compute the bounding canvas for the requested rotation,
//! inverse-map every canvas pixel back into source space with bilinear
//! sampling, push each sampled pixel through the spec's color chain, and
//! encode at quality 90. Canvas regions the rotated source does not cover
//! stay black — JPEG carries no alpha.
//!
//! The original raster is never mutated; every render produces a new
//! artifact. Given a fixed `(original, spec)` pair the output bytes are
//! reproducible — the per-pixel math is pure and the encoder in use is
//! deterministic (a property of the encoder, not re-guaranteed here).

use super::filter::EditSpec;
use super::geometry::canvas_size;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, Rgb, RgbImage};
use thiserror::Error;

/// JPEG quality for rendered edits (thumbnails use 70).
pub const EDIT_QUALITY: u8 = 90;

#[derive(Error, Debug)]
pub enum EditError {
    #[error("failed to decode source image: {0}")]
    SourceLoad(String),
    #[error("failed to encode edited image: {0}")]
    Encode(String),
}

/// Decode an encoded image into a raster, surfacing failures as
/// [`EditError::SourceLoad`].
pub fn decode_source(bytes: &[u8]) -> Result<DynamicImage, EditError> {
    image::load_from_memory(bytes).map_err(|e| EditError::SourceLoad(e.to_string()))
}

/// Rasterize `original` through `spec` and encode the result as JPEG.
pub fn render(original: &DynamicImage, spec: &EditSpec) -> Result<Vec<u8>, EditError> {
    let (src_w, src_h) = (original.width(), original.height());
    let (canvas_w, canvas_h) = canvas_size(src_w, src_h, spec.rotation_degrees());
    if canvas_w == 0 || canvas_h == 0 {
        return Err(EditError::Encode("zero-sized canvas".into()));
    }

    let source = original.to_rgb8();
    let chain = spec.color_chain();
    let (sin, cos) = spec.rotation_degrees().to_radians().sin_cos();
    let (canvas_cx, canvas_cy) = (f64::from(canvas_w) / 2.0, f64::from(canvas_h) / 2.0);
    let (src_cx, src_cy) = (f64::from(src_w) / 2.0, f64::from(src_h) / 2.0);

    // Uncovered pixels keep the zeroed (black) default.
    let mut canvas = RgbImage::new(canvas_w, canvas_h);
    for y in 0..canvas_h {
        for x in 0..canvas_w {
            let dx = f64::from(x) + 0.5 - canvas_cx;
            let dy = f64::from(y) + 0.5 - canvas_cy;
            // inverse-rotate the canvas pixel back into source space
            let u = dx * cos + dy * sin + src_cx;
            let v = -dx * sin + dy * cos + src_cy;
            if let Some(rgb) = sample_bilinear(&source, u, v) {
                canvas.put_pixel(x, y, Rgb(chain.apply(rgb)));
            }
        }
    }

    encode_jpeg(&canvas, EDIT_QUALITY)
}

/// Decode, render, encode — the full pipeline from original bytes.
pub fn render_bytes(original: &[u8], spec: &EditSpec) -> Result<Vec<u8>, EditError> {
    let source = decode_source(original)?;
    render(&source, spec)
}

/// Bilinearly sample the source at continuous coordinates `(u, v)`.
///
/// Returns `None` when the point lies outside the source rectangle; edge
/// taps are clamped so border pixels do not bleed black.
fn sample_bilinear(source: &RgbImage, u: f64, v: f64) -> Option<[u8; 3]> {
    let (w, h) = (source.width(), source.height());
    if u < 0.0 || v < 0.0 || u >= f64::from(w) || v >= f64::from(h) {
        return None;
    }

    // shift to pixel-center coordinates
    let fu = (u - 0.5).max(0.0);
    let fv = (v - 0.5).max(0.0);
    let x0 = fu.floor() as u32;
    let y0 = fv.floor() as u32;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);
    let tx = (fu - fu.floor()) as f32;
    let ty = (fv - fv.floor()) as f32;

    let p00 = source.get_pixel(x0, y0).0;
    let p10 = source.get_pixel(x1, y0).0;
    let p01 = source.get_pixel(x0, y1).0;
    let p11 = source.get_pixel(x1, y1).0;

    let mut out = [0u8; 3];
    for c in 0..3 {
        let top = f32::from(p00[c]) * (1.0 - tx) + f32::from(p10[c]) * tx;
        let bottom = f32::from(p01[c]) * (1.0 - tx) + f32::from(p11[c]) * tx;
        out[c] = (top * (1.0 - ty) + bottom * ty).round() as u8;
    }
    Some(out)
}

/// Encode a raster as JPEG at the given quality.
pub(super) fn encode_jpeg(raster: &RgbImage, quality: u8) -> Result<Vec<u8>, EditError> {
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality)
        .write_image(
            raster.as_raw(),
            raster.width(),
            raster.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| EditError::Encode(e.to_string()))?;
    Ok(bytes)
}
