//! Nearest neighbor interpolation.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use super::trait_::Interpolator;
use crate::error::Result;

/// Nearest Neighbor Interpolator.
///
/// Rounds each coordinate to the nearest integer index, clamping to the
/// volume bounds. Preserves label values exactly, which makes it the method
/// of choice for mask pre-alignment.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighborInterpolator;

impl NearestNeighborInterpolator {
    /// Create a new nearest neighbor interpolator.
    pub fn new() -> Self {
        Self
    }
}

impl<B: Backend> Interpolator<B> for NearestNeighborInterpolator {
    fn interpolate(&self, data: &Tensor<B, 3>, indices: Tensor<B, 2>) -> Result<Tensor<B, 1>> {
        let [nz, ny, nx] = data.dims();
        let n = indices.dims()[0];

        // indices: (x, y, z)
        let x = indices.clone().narrow(1, 0, 1).squeeze::<1>(1);
        let y = indices.clone().narrow(1, 1, 1).squeeze::<1>(1);
        let z = indices.narrow(1, 2, 1).squeeze::<1>(1);

        let x_i = x.round().clamp(0.0, (nx - 1) as f64).int();
        let y_i = y.round().clamp(0.0, (ny - 1) as f64).int();
        let z_i = z.round().clamp(0.0, (nz - 1) as f64).int();

        // Strides for [Z, Y, X] layout
        let stride_z = (ny * nx) as i32;
        let stride_y = nx as i32;

        let idx = z_i * stride_z + y_i * stride_y + x_i;
        let flat = data.clone().reshape([nz * ny * nx]);
        debug_assert_eq!(idx.dims()[0], n);
        Ok(flat.gather(0, idx))
    }
}
