//! Pure calculation functions for rotated-image geometry.
//!
//! All functions here are pure and testable without any I/O or images.

/// Minimal axis-aligned bounding box for an image rotated about its center.
///
/// For a `w`×`h` source rotated by `degrees`, the box is
/// `W = w·|cos θ| + h·|sin θ|`, `H = w·|sin θ| + h·|cos θ|`.
///
/// # Examples
/// ```
/// # use vaultgal::editing::rotated_bounds;
/// // No rotation: bounds are the source dimensions
/// assert_eq!(rotated_bounds(800.0, 600.0, 0.0), (800.0, 600.0));
///
/// // 45° square: diagonal-sized box
/// let (w, h) = rotated_bounds(100.0, 100.0, 45.0);
/// assert!((w - 141.42).abs() < 0.01);
/// assert!((h - 141.42).abs() < 0.01);
/// ```
pub fn rotated_bounds(w: f64, h: f64, degrees: f64) -> (f64, f64) {
    let radians = degrees.to_radians();
    let cos = radians.cos().abs();
    let sin = radians.sin().abs();
    (w * cos + h * sin, w * sin + h * cos)
}

/// Integer canvas size holding a rotated `w`×`h` image without clipping.
///
/// Rounds the real-valued box up, never down. A small tolerance absorbs the
/// floating-point residue of `sin`/`cos` at the quadrant angles so that
/// 0/90/180/270 produce exact dimension swaps.
pub fn canvas_size(w: u32, h: u32, degrees: f64) -> (u32, u32) {
    let (bw, bh) = rotated_bounds(f64::from(w), f64::from(h), degrees);
    let round_up = |v: f64| (v - 1e-6).ceil().max(1.0) as u32;
    (round_up(bw), round_up(bh))
}
