//! Interpolation of volume values at continuous coordinates.

pub mod bspline;
pub mod linear;
pub mod nearest;
pub mod trait_;

pub use bspline::BSplineInterpolator;
pub use linear::LinearInterpolator;
pub use nearest::NearestNeighborInterpolator;
pub use trait_::Interpolator;

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::error::Result;

/// Interpolation method used when resampling a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Nearest-neighbor sampling.
    Nearest,
    /// Trilinear interpolation.
    #[default]
    Linear,
    /// Cubic B-spline interpolation.
    BSpline,
}

impl Interpolation {
    /// Sample `data` at the given `[N, 3]` continuous (x, y, z) indices.
    pub fn interpolate<B: Backend>(
        &self,
        data: &Tensor<B, 3>,
        indices: Tensor<B, 2>,
    ) -> Result<Tensor<B, 1>> {
        match self {
            Interpolation::Nearest => NearestNeighborInterpolator::new().interpolate(data, indices),
            Interpolation::Linear => LinearInterpolator::new().interpolate(data, indices),
            Interpolation::BSpline => BSplineInterpolator::new().interpolate(data, indices),
        }
    }
}

impl std::fmt::Display for Interpolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Interpolation::Nearest => "nearest",
            Interpolation::Linear => "linear",
            Interpolation::BSpline => "bspline",
        };
        f.write_str(name)
    }
}
