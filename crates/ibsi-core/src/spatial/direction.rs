//! Direction type for representing image orientation.
//!
//! Direction matrices represent the orientation of image axes in physical
//! space.

use super::Vector3;
use nalgebra::Matrix3;

/// Direction matrix representing image orientation.
///
/// A 3x3 matrix whose column i is the physical-space direction of the i-th
/// image axis. For well-formed images this is orthonormal.
///
/// This is a thin wrapper around nalgebra's Matrix3 to provide
/// domain-specific functionality while maintaining all nalgebra operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction3(pub Matrix3<f64>);

impl Direction3 {
    /// Create an identity direction matrix (no rotation).
    pub fn identity() -> Self {
        Self(Matrix3::identity())
    }

    /// Check if the direction matrix is orthogonal (rotation or reflection).
    pub fn is_orthogonal(&self) -> bool {
        let product = self.0 * self.0.transpose();
        let identity = Matrix3::<f64>::identity();
        (0..3).all(|i| (0..3).all(|j| (product[(i, j)] - identity[(i, j)]).abs() < 1e-6))
    }

    /// Try to compute the inverse of the direction matrix.
    pub fn try_inverse(&self) -> Option<Self> {
        self.0.try_inverse().map(Self)
    }

    /// Get the inner nalgebra matrix.
    pub fn inner(&self) -> &Matrix3<f64> {
        &self.0
    }
}

impl std::ops::Index<(usize, usize)> for Direction3 {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.0[index]
    }
}

impl std::ops::IndexMut<(usize, usize)> for Direction3 {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl std::ops::Mul for Direction3 {
    type Output = Self;

    fn mul(self, other: Self) -> Self::Output {
        Self(self.0 * other.0)
    }
}

impl std::ops::Mul<Vector3> for Direction3 {
    type Output = Vector3;

    fn mul(self, vector: Vector3) -> Self::Output {
        Vector3(self.0 * vector.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_identity() {
        let d = Direction3::identity();
        assert_eq!(d[(0, 0)], 1.0);
        assert_eq!(d[(1, 1)], 1.0);
        assert_eq!(d[(2, 2)], 1.0);
        assert!(d.is_orthogonal());
    }

    #[test]
    fn test_direction_rotation_is_orthogonal() {
        // 90 degrees around Z
        let mut rot = Direction3::identity();
        rot[(0, 0)] = 0.0;
        rot[(0, 1)] = -1.0;
        rot[(1, 0)] = 1.0;
        rot[(1, 1)] = 0.0;
        assert!(rot.is_orthogonal());
    }

    #[test]
    fn test_direction_inverse() {
        let d = Direction3::identity();
        assert_eq!(d.try_inverse(), Some(d));

        let singular = Direction3(Matrix3::zeros());
        assert!(singular.try_inverse().is_none());
    }

    #[test]
    fn test_direction_vector_product() {
        let mut rot = Direction3::identity();
        rot[(0, 0)] = 0.0;
        rot[(0, 1)] = -1.0;
        rot[(1, 0)] = 1.0;
        rot[(1, 1)] = 0.0;

        let v = rot * Vector3::new([1.0, 0.0, 0.0]);
        assert!((v[0] - 0.0).abs() < 1e-12);
        assert!((v[1] - 1.0).abs() < 1e-12);
    }
}
