//! Spacing type for representing physical distances between voxels.
//!
//! Spacing represents the physical distance between adjacent voxel centers
//! along each axis of an image.

use super::Vector3;

/// Spacing between adjacent voxels along each axis.
///
/// This is a type alias to Vector3 for semantic clarity.
pub type Spacing3 = Vector3;

impl Spacing3 {
    /// Create uniform spacing (same value for all axes).
    pub fn uniform(value: f64) -> Self {
        Self::new([value, value, value])
    }

    /// Check if spacing is uniform (all components equal).
    pub fn is_uniform(&self) -> bool {
        (self[1] - self[0]).abs() < 1e-9 && (self[2] - self[0]).abs() < 1e-9
    }

    /// True if every component is finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        (0..3).all(|i| self[i].is_finite() && self[i] > 0.0)
    }
}
