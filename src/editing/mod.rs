//! Client-side image editing — pure Rust, statically linked.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** (JPEG, PNG, TIFF, WebP) | `image` crate (pure Rust decoders) |
//! | **Rotation** | inverse mapping + bilinear sampling onto a bounding canvas |
//! | **Color transform** | fixed brightness → contrast → filter stage chain |
//! | **Thumbnail resize** | `image::imageops` Lanczos3 |
//! | **Encode** | `JpegEncoder::new_with_quality` (90 for edits, 70 for thumbnails) |
//!
//! The module is split into:
//! - **Geometry**: pure bounding-box math for rotated images (unit testable)
//! - **Filter**: the edit specification and its color stage chain
//! - **Thumbnail**: aspect-preserving downsample to a bounded footprint
//! - **Pipeline**: rasterize an original + specification into encoded bytes

pub mod filter;
pub mod geometry;
pub mod pipeline;
pub mod thumbnail;

pub use filter::{ColorChain, ColorMatrix, EditSpec, FilterKind};
pub use geometry::{canvas_size, rotated_bounds};
pub use pipeline::{EditError, decode_source, render, render_bytes};
pub use thumbnail::{THUMBNAIL_MAX_DIM, thumbnail_dimensions, thumbnail_jpeg};
