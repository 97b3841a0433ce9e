//! Label mask paired with an intensity image.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use super::Grid;
use crate::error::{ResampleError, Result};

/// Volumetric label mask.
///
/// Shares the [`Grid`] of its paired image. Label values are held as floats;
/// after resampling the values are strictly binary (0 or 1), which
/// [`Mask::is_binary`] verifies.
#[derive(Debug, Clone)]
pub struct Mask<B: Backend> {
    data: Tensor<B, 3>,
    grid: Grid,
}

impl<B: Backend> Mask<B> {
    /// Create a new mask.
    ///
    /// Fails with [`ResampleError::InvalidGrid`] if the tensor shape does
    /// not match the grid size.
    pub fn new(data: Tensor<B, 3>, grid: Grid) -> Result<Self> {
        let dims: [usize; 3] = data.dims();
        if dims != grid.tensor_dims() {
            return Err(ResampleError::invalid_grid(format!(
                "mask shape {:?} does not match grid dims {:?}",
                dims,
                grid.tensor_dims()
            )));
        }
        Ok(Self { data, grid })
    }

    /// Get the label data tensor ([z, y, x] layout).
    pub fn data(&self) -> &Tensor<B, 3> {
        &self.data
    }

    /// Get the sampling grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Tensor shape, [z, y, x].
    pub fn shape(&self) -> [usize; 3] {
        self.data.dims()
    }

    /// True if every label is exactly 0 or 1.
    pub fn is_binary(&self) -> bool {
        let data = self.data.to_data();
        match data.as_slice::<f32>() {
            Ok(slice) => slice.iter().all(|&v| v == 0.0 || v == 1.0),
            Err(_) => false,
        }
    }
}
