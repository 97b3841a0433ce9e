//! Cubic B-spline interpolation.

use burn::tensor::backend::Backend;
use burn::tensor::{Shape, Tensor, TensorData};

use super::trait_::Interpolator;
use crate::error::{ResampleError, Result};

/// Cubic B-spline basis function.
///
/// - (2/3) - |x|^2 + (1/2)|x|^3    for |x| < 1
/// - (1/6)(2 - |x|)^3              for 1 <= |x| < 2
/// - 0                             otherwise
fn cubic_bspline(x: f32) -> f32 {
    let abs_x = x.abs();
    if abs_x < 1.0 {
        (2.0 / 3.0) - abs_x.powi(2) + 0.5 * abs_x.powi(3)
    } else if abs_x < 2.0 {
        let two_minus_x = 2.0 - abs_x;
        (1.0 / 6.0) * two_minus_x.powi(3)
    } else {
        0.0
    }
}

/// Cubic B-spline interpolator.
///
/// Applies the cubic kernel over the 4x4x4 neighborhood of each continuous
/// index. Weights of out-of-bounds neighbors are dropped and the remainder
/// renormalized, which keeps border values in the data range.
///
/// The kernel is applied directly, without the prefiltering pass some
/// toolkits perform, so the result smooths rather than strictly
/// interpolates the samples.
#[derive(Debug, Clone, Copy, Default)]
pub struct BSplineInterpolator;

impl BSplineInterpolator {
    /// Create a new B-spline interpolator.
    pub fn new() -> Self {
        Self
    }
}

impl<B: Backend> Interpolator<B> for BSplineInterpolator {
    fn interpolate(&self, data: &Tensor<B, 3>, indices: Tensor<B, 2>) -> Result<Tensor<B, 1>> {
        let [nz, ny, nx] = data.dims();
        let n_points = indices.dims()[0];
        let device = indices.device();

        let volume = data.to_data();
        let volume = volume
            .as_slice::<f32>()
            .map_err(|e| ResampleError::interpolation(format!("volume data is not f32: {e:?}")))?;
        let coords = indices.to_data();
        let coords = coords
            .as_slice::<f32>()
            .map_err(|e| ResampleError::interpolation(format!("indices are not f32: {e:?}")))?;

        let stride_z = ny * nx;
        let stride_y = nx;

        let mut results = Vec::with_capacity(n_points);
        for i in 0..n_points {
            let x = coords[i * 3];
            let y = coords[i * 3 + 1];
            let z = coords[i * 3 + 2];

            let x0 = x.floor() as isize - 1;
            let y0 = y.floor() as isize - 1;
            let z0 = z.floor() as isize - 1;

            let mut acc = 0.0f32;
            let mut weight_sum = 0.0f32;

            for dz in 0..4 {
                let zi = z0 + dz;
                if zi < 0 || zi >= nz as isize {
                    continue;
                }
                let wz = cubic_bspline(z - zi as f32);
                for dy in 0..4 {
                    let yi = y0 + dy;
                    if yi < 0 || yi >= ny as isize {
                        continue;
                    }
                    let wy = cubic_bspline(y - yi as f32);
                    for dx in 0..4 {
                        let xi = x0 + dx;
                        if xi < 0 || xi >= nx as isize {
                            continue;
                        }
                        let wx = cubic_bspline(x - xi as f32);
                        let weight = wx * wy * wz;
                        let sample =
                            volume[zi as usize * stride_z + yi as usize * stride_y + xi as usize];
                        acc += sample * weight;
                        weight_sum += weight;
                    }
                }
            }

            results.push(if weight_sum > 0.0 { acc / weight_sum } else { 0.0 });
        }

        Ok(Tensor::from_data(
            TensorData::new(results, Shape::new([n_points])),
            &device,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::tensor::TensorData;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_cubic_kernel() {
        assert!((cubic_bspline(0.0) - 2.0 / 3.0).abs() < 1e-6);
        assert!((cubic_bspline(1.0) - 1.0 / 6.0).abs() < 1e-6);
        assert_eq!(cubic_bspline(2.0), 0.0);
        assert_eq!(cubic_bspline(-2.5), 0.0);
        // Symmetric
        assert_eq!(cubic_bspline(0.5), cubic_bspline(-0.5));
    }

    #[test]
    fn test_bspline_constant_volume() {
        let device = Default::default();
        let data = Tensor::<TestBackend, 3>::ones([4, 4, 4], &device).mul_scalar(7.0);
        let interpolator = BSplineInterpolator::new();

        let indices = Tensor::<TestBackend, 2>::from_floats(
            [[1.5, 1.5, 1.5], [0.0, 0.0, 0.0], [3.0, 3.0, 3.0]],
            &device,
        );
        let values = interpolator.interpolate(&data, indices).unwrap();
        let values_data = values.into_data();
        let slice = values_data.as_slice::<f32>().unwrap();

        // Renormalized weights reproduce constants exactly, borders included.
        for &v in slice {
            assert!((v - 7.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_bspline_stays_in_value_range() {
        let device = Default::default();
        let data: Vec<f32> = (0..27).map(|v| v as f32).collect();
        let data = Tensor::<TestBackend, 3>::from_data(
            TensorData::new(data, burn::tensor::Shape::new([3, 3, 3])),
            &device,
        );
        let interpolator = BSplineInterpolator::new();

        let indices = Tensor::<TestBackend, 2>::from_floats(
            [[1.0, 1.0, 1.0], [0.5, 0.5, 0.5], [2.0, 2.0, 2.0]],
            &device,
        );
        let values = interpolator.interpolate(&data, indices).unwrap();
        let values_data = values.into_data();
        let slice = values_data.as_slice::<f32>().unwrap();

        for &v in slice {
            assert!((0.0..=26.0).contains(&v));
        }
    }
}
