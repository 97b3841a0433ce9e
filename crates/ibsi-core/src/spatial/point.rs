//! Point type for representing spatial coordinates.

use super::Vector3;
use nalgebra::Point3 as NaPoint3;

/// A point in 3D physical space.
///
/// Points represent positions in physical coordinate systems: image origins,
/// grid centers, world coordinates of voxels.
///
/// This is a thin wrapper around nalgebra's Point3 to provide
/// domain-specific functionality while maintaining all nalgebra operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3(pub NaPoint3<f64>);

impl Point3 {
    /// Create a new point from coordinates.
    pub fn new(coords: [f64; 3]) -> Self {
        Self(NaPoint3::from(coords))
    }

    /// Create a point at the origin.
    pub fn origin() -> Self {
        Self(NaPoint3::origin())
    }

    /// Convert point to an array of coordinates.
    pub fn to_array(&self) -> [f64; 3] {
        [self.0.x, self.0.y, self.0.z]
    }

    /// Get the inner nalgebra point.
    pub fn inner(&self) -> &NaPoint3<f64> {
        &self.0
    }
}

impl std::ops::Index<usize> for Point3 {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0.coords[index]
    }
}

impl std::ops::IndexMut<usize> for Point3 {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0.coords[index]
    }
}

impl std::ops::Sub for Point3 {
    type Output = Vector3;

    fn sub(self, other: Self) -> Self::Output {
        Vector3(self.0.coords - other.0.coords)
    }
}

impl std::ops::Add<Vector3> for Point3 {
    type Output = Self;

    fn add(self, vector: Vector3) -> Self::Output {
        Self(self.0 + vector.0)
    }
}
