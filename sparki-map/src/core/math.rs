//! Angle utilities.
//!
//! Headings and bearings are in degrees, counter-clockwise from the +X axis,
//! normalized to [0, 360).

/// Normalize an angle in degrees to [0, 360).
///
/// # Example
/// ```
/// use sparki_map::core::math::normalize_degrees;
///
/// assert_eq!(normalize_degrees(450.0), 90.0);
/// assert_eq!(normalize_degrees(360.0), 0.0);
/// assert_eq!(normalize_degrees(-90.0), 270.0);
/// ```
#[inline]
pub fn normalize_degrees(deg: f64) -> f64 {
    let a = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Bearing from `(from_x, from_y)` to `(to_x, to_y)` in degrees, [0, 360).
///
/// The bearing of a point onto itself is 0.
#[inline]
pub fn bearing_deg(from_x: f64, from_y: f64, to_x: f64, to_y: f64) -> f64 {
    normalize_degrees((to_y - from_y).atan2(to_x - from_x).to_degrees())
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(from_x: f64, from_y: f64, to_x: f64, to_y: f64) -> f64 {
    (to_x - from_x).hypot(to_y - from_y)
}
