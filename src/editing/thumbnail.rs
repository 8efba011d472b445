//! Thumbnail generation: bounded, aspect-preserving preview rasters.
//!
//! Thumbnails are derived exactly once, when an asset is created, from the
//! original photo frame or a sampled video frame. The longer side is scaled
//! to exactly [`THUMBNAIL_MAX_DIM`] — sources smaller than the target are
//! upscaled too, matching the shipped behavior. Encoding quality is
//! deliberately lower than the edit pipeline's: previews trade fidelity for
//! bandwidth and storage.

use super::pipeline::{EditError, encode_jpeg};
use image::DynamicImage;
use image::imageops::FilterType;

/// Cap on the thumbnail's longer side, in pixels.
pub const THUMBNAIL_MAX_DIM: u32 = 300;

/// JPEG quality for thumbnails (the edit pipeline uses 90).
pub const THUMBNAIL_QUALITY: u8 = 70;

/// Scale `w`×`h` so the longer side is exactly `max_dim`, preserving aspect
/// ratio with the shorter side rounded to the nearest pixel (minimum 1).
///
/// # Examples
/// ```
/// # use vaultgal::editing::thumbnail_dimensions;
/// assert_eq!(thumbnail_dimensions(800, 400, 300), (300, 150));
/// assert_eq!(thumbnail_dimensions(400, 800, 300), (150, 300));
/// assert_eq!(thumbnail_dimensions(300, 300, 300), (300, 300));
/// ```
pub fn thumbnail_dimensions(w: u32, h: u32, max_dim: u32) -> (u32, u32) {
    if w >= h {
        let short = (f64::from(h) * f64::from(max_dim) / f64::from(w)).round() as u32;
        (max_dim, short.max(1))
    } else {
        let short = (f64::from(w) * f64::from(max_dim) / f64::from(h)).round() as u32;
        (short.max(1), max_dim)
    }
}

/// Downsample a frame to the thumbnail footprint and encode it as JPEG.
pub fn thumbnail_jpeg(frame: &DynamicImage) -> Result<Vec<u8>, EditError> {
    let (w, h) = thumbnail_dimensions(frame.width(), frame.height(), THUMBNAIL_MAX_DIM);
    let scaled = frame.resize_exact(w, h, FilterType::Lanczos3).to_rgb8();
    encode_jpeg(&scaled, THUMBNAIL_QUALITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::gradient_image;

    // =========================================================================
    // thumbnail_dimensions tests
    // =========================================================================

    #[test]
    fn landscape_scales_width_to_cap() {
        assert_eq!(thumbnail_dimensions(800, 400, 300), (300, 150));
    }

    #[test]
    fn portrait_scales_height_to_cap() {
        assert_eq!(thumbnail_dimensions(400, 800, 300), (150, 300));
    }

    #[test]
    fn square_fills_the_cap_exactly() {
        assert_eq!(thumbnail_dimensions(300, 300, 300), (300, 300));
        assert_eq!(thumbnail_dimensions(1200, 1200, 300), (300, 300));
    }

    #[test]
    fn small_sources_are_upscaled() {
        // no only-downscale guard: a 60×30 source still lands at the cap
        assert_eq!(thumbnail_dimensions(60, 30, 300), (300, 150));
    }

    #[test]
    fn extreme_aspect_never_collapses_to_zero() {
        assert_eq!(thumbnail_dimensions(10_000, 10, 300), (300, 1));
    }

    #[test]
    fn short_side_rounds_to_nearest() {
        // 453×302 → 300×200.04 → 300×200
        assert_eq!(thumbnail_dimensions(453, 302, 300), (300, 200));
    }

    // =========================================================================
    // thumbnail_jpeg tests
    // =========================================================================

    #[test]
    fn encoded_thumbnail_has_capped_dimensions() {
        let frame = gradient_image(800, 400);
        let bytes = thumbnail_jpeg(&frame).unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (300, 150));
    }

    #[test]
    fn thumbnail_is_jpeg_encoded() {
        let bytes = thumbnail_jpeg(&gradient_image(64, 64)).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8], "missing JPEG SOI marker");
    }
}
