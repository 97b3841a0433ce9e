//! Interpolator trait for sampling volumes at continuous coordinates.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::error::Result;

/// Interpolator trait for sampling values at continuous coordinates.
///
/// Interpolators sample volume values at non-integer coordinates, which is
/// the heart of resampling onto a new grid.
///
/// # Type Parameters
/// * `B` - The backend
pub trait Interpolator<B: Backend> {
    /// Interpolate values from a `[Z, Y, X]` volume at continuous indices.
    ///
    /// Fails with [`crate::ResampleError::Interpolation`] when the backend
    /// cannot deliver the volume as f32 samples.
    ///
    /// # Arguments
    /// * `data` - The source volume `[Z, Y, X]`
    /// * `indices` - Continuous (x, y, z) indices `[N, 3]`
    ///
    /// # Returns
    /// Tensor of sampled values `[N]`
    fn interpolate(&self, data: &Tensor<B, 3>, indices: Tensor<B, 2>) -> Result<Tensor<B, 1>>;
}
