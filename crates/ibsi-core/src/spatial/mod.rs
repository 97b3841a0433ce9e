//! Spatial types for representing points, vectors, spacing, and direction matrices.
//!
//! All types are thin wrappers around nalgebra, fixed to three dimensions:
//! the benchmark only handles 3D volumetric grids.

pub mod direction;
pub mod point;
pub mod spacing;
pub mod vector;

pub use direction::Direction3;
pub use point::Point3;
pub use spacing::Spacing3;
pub use vector::Vector3;
