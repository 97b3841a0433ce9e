//! Trilinear interpolation.

use burn::tensor::backend::Backend;
use burn::tensor::{Int, Tensor};

use super::trait_::Interpolator;
use crate::error::Result;

/// Linear (trilinear) interpolator.
///
/// Gathers the eight corner voxels around each continuous index and blends
/// them along x, y, then z. Out-of-range corners are clamped to the volume
/// border.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearInterpolator;

impl LinearInterpolator {
    /// Create a new linear interpolator.
    pub fn new() -> Self {
        Self
    }
}

impl<B: Backend> Interpolator<B> for LinearInterpolator {
    fn interpolate(&self, data: &Tensor<B, 3>, indices: Tensor<B, 2>) -> Result<Tensor<B, 1>> {
        let [nz, ny, nx] = data.dims();
        let batch = indices.dims()[0];
        let device = indices.device();

        // indices: (x, y, z)
        let x = indices.clone().narrow(1, 0, 1).squeeze::<1>(1);
        let y = indices.clone().narrow(1, 1, 1).squeeze::<1>(1);
        let z = indices.narrow(1, 2, 1).squeeze::<1>(1);

        let x0 = x.clone().floor();
        let y0 = y.clone().floor();
        let z0 = z.clone().floor();

        let wx = x - x0.clone();
        let wy = y - y0.clone();
        let wz = z - z0.clone();

        let x1 = x0.clone() + 1.0;
        let y1 = y0.clone() + 1.0;
        let z1 = z0.clone() + 1.0;

        let x0_i = x0.clamp(0.0, (nx - 1) as f64).int();
        let y0_i = y0.clamp(0.0, (ny - 1) as f64).int();
        let z0_i = z0.clamp(0.0, (nz - 1) as f64).int();
        let x1_i = x1.clamp(0.0, (nx - 1) as f64).int();
        let y1_i = y1.clamp(0.0, (ny - 1) as f64).int();
        let z1_i = z1.clamp(0.0, (nz - 1) as f64).int();

        // Strides for [Z, Y, X] layout
        let stride_z = (ny * nx) as i32;
        let stride_y = nx as i32;

        let flat = data.clone().reshape([nz * ny * nx]);

        let gather = |xi: &Tensor<B, 1, Int>, yi: &Tensor<B, 1, Int>, zi: &Tensor<B, 1, Int>| {
            let idx = zi.clone() * stride_z + yi.clone() * stride_y + xi.clone();
            flat.clone().gather(0, idx)
        };

        let v000 = gather(&x0_i, &y0_i, &z0_i);
        let v001 = gather(&x0_i, &y0_i, &z1_i);
        let v010 = gather(&x0_i, &y1_i, &z0_i);
        let v011 = gather(&x0_i, &y1_i, &z1_i);
        let v100 = gather(&x1_i, &y0_i, &z0_i);
        let v101 = gather(&x1_i, &y0_i, &z1_i);
        let v110 = gather(&x1_i, &y1_i, &z0_i);
        let v111 = gather(&x1_i, &y1_i, &z1_i);

        let one = Tensor::<B, 1>::ones([batch], &device);
        let one_minus_wx = one.clone() - wx.clone();
        let one_minus_wy = one.clone() - wy.clone();
        let one_minus_wz = one - wz.clone();

        // Interpolate along X
        let c00 = v000 * one_minus_wx.clone() + v100 * wx.clone();
        let c01 = v001 * one_minus_wx.clone() + v101 * wx.clone();
        let c10 = v010 * one_minus_wx.clone() + v110 * wx.clone();
        let c11 = v011 * one_minus_wx + v111 * wx;

        // Interpolate along Y
        let c0 = c00 * one_minus_wy.clone() + c10 * wy.clone();
        let c1 = c01 * one_minus_wy + c11 * wy;

        // Interpolate along Z
        Ok(c0 * one_minus_wz + c1 * wz)
    }
}
