//! Intensity image with physical metadata.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use super::{Grid, PixelType};
use crate::error::{ResampleError, Result};

/// Volumetric intensity image.
///
/// Combines tensor data in [z, y, x] layout with the [`Grid`] describing how
/// voxel indices map to physical coordinates, plus the declared
/// [`PixelType`] of the source data.
///
/// # Type Parameters
/// * `B` - The backend for tensor operations
#[derive(Debug, Clone)]
pub struct Image<B: Backend> {
    data: Tensor<B, 3>,
    grid: Grid,
    pixel_type: PixelType,
}

impl<B: Backend> Image<B> {
    /// Create a new image.
    ///
    /// Fails with [`ResampleError::InvalidGrid`] if the tensor shape does
    /// not match the grid size.
    pub fn new(data: Tensor<B, 3>, grid: Grid, pixel_type: PixelType) -> Result<Self> {
        let dims: [usize; 3] = data.dims();
        if dims != grid.tensor_dims() {
            return Err(ResampleError::invalid_grid(format!(
                "data shape {:?} does not match grid dims {:?}",
                dims,
                grid.tensor_dims()
            )));
        }
        Ok(Self {
            data,
            grid,
            pixel_type,
        })
    }

    /// Get the voxel data tensor ([z, y, x] layout).
    pub fn data(&self) -> &Tensor<B, 3> {
        &self.data
    }

    /// Get the sampling grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Get the declared pixel type.
    pub fn pixel_type(&self) -> PixelType {
        self.pixel_type
    }

    /// Tensor shape, [z, y, x].
    pub fn shape(&self) -> [usize; 3] {
        self.data.dims()
    }
}
