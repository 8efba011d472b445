//! Shared test utilities for the vaultgal test suite.
//!
//! Provides synthetic rasters, encoded fixture bytes, and prebuilt media
//! assets so unit tests never depend on files checked into the repository.

use crate::types::{MediaAsset, MediaKind};
use chrono::{TimeZone, Utc};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbImage};

// =========================================================================
// Synthetic rasters
// =========================================================================

/// A deterministic non-uniform test image. The gradient makes channel
/// mixing visible, which filter-order tests rely on.
pub fn gradient_image(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    DynamicImage::ImageRgb8(img)
}

/// JPEG-encoded bytes of a [`gradient_image`].
pub fn test_jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = gradient_image(width, height).to_rgb8();
    let mut bytes = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut bytes)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    bytes
}

// =========================================================================
// Prebuilt assets
// =========================================================================

/// An asset with tiny placeholder blobs. The title doubles as content so
/// distinct titles get distinct identifiers.
pub fn test_asset(title: impl Into<String>, kind: MediaKind) -> MediaAsset {
    let title = title.into();
    let bytes = title.clone().into_bytes();
    MediaAsset::new(
        title,
        kind,
        bytes,
        vec![0xFF, 0xD8],
        Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap(),
    )
}

/// A locked photo asset.
pub fn locked_asset(title: impl Into<String>) -> MediaAsset {
    let mut asset = test_asset(title, MediaKind::Photo);
    asset.locked = true;
    asset
}

/// A photo asset whose original blob is a real decodable JPEG.
pub fn test_photo_asset(title: impl Into<String>, width: u32, height: u32) -> MediaAsset {
    MediaAsset::new(
        title,
        MediaKind::Photo,
        test_jpeg_bytes(width, height),
        vec![0xFF, 0xD8],
        Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap(),
    )
}
