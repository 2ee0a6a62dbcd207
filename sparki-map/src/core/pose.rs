//! Robot pose on the map.

use super::math::normalize_degrees;

/// Believed robot position and heading.
///
/// Position is in grid cells (one cell per centimeter), with the grid
/// center as the starting point. Heading is in degrees, counter-clockwise
/// from +X, kept in [0, 360).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose {
    /// X position in cells (cm).
    pub x: f64,
    /// Y position in cells (cm).
    pub y: f64,
    /// Heading in degrees [0, 360).
    pub heading_deg: f64,
}

impl Pose {
    /// Create a new pose; heading is normalized to [0, 360).
    #[inline]
    pub fn new(x: f64, y: f64, heading_deg: f64) -> Self {
        Self {
            x,
            y,
            heading_deg: normalize_degrees(heading_deg),
        }
    }

    /// Pose at the center of a `width` x `height` grid, facing +X.
    #[inline]
    pub fn grid_center(width: usize, height: usize) -> Self {
        Self::new((width / 2) as f64, (height / 2) as f64, 0.0)
    }

    /// Heading in radians.
    #[inline]
    pub fn heading_rad(&self) -> f64 {
        self.heading_deg.to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_heading() {
        assert_eq!(Pose::new(0.0, 0.0, 450.0).heading_deg, 90.0);
        assert_eq!(Pose::new(0.0, 0.0, -90.0).heading_deg, 270.0);
    }

    #[test]
    fn test_grid_center() {
        let pose = Pose::grid_center(500, 500);
        assert_eq!(pose, Pose::new(250.0, 250.0, 0.0));
    }
}
