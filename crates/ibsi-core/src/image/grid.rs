//! Axis-aligned 3D sampling grid.
//!
//! A `Grid` describes how voxel indices map to physical coordinates: origin,
//! spacing, direction, and voxel counts. Images and masks carry a `Grid`;
//! the resampler plans new ones.

use burn::tensor::backend::Backend;
use burn::tensor::{Shape, Tensor, TensorData};

use crate::error::{ResampleError, Result};
use crate::spatial::{Direction3, Point3, Spacing3, Vector3};

/// Axis-aligned 3D voxel lattice in physical space.
///
/// `size` counts voxels per physical axis (x, y, z). Tensor data associated
/// with a grid is stored in [z, y, x] layout; continuous index points are
/// ordered (x, y, z) to match `size` and `spacing`.
///
/// # Coordinate Systems
/// * **Index space**: continuous voxel indices.
/// * **Physical space**: world coordinates (mm), via
///   `point = origin + direction * (index * spacing)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    size: [usize; 3],
    origin: Point3,
    spacing: Spacing3,
    direction: Direction3,
}

impl Grid {
    /// Create a new grid.
    ///
    /// Fails with [`ResampleError::InvalidGrid`] if any size component is
    /// zero, the spacing is not finite and strictly positive, or the
    /// direction matrix is singular.
    pub fn new(
        size: [usize; 3],
        origin: Point3,
        spacing: Spacing3,
        direction: Direction3,
    ) -> Result<Self> {
        if size.iter().any(|&n| n == 0) {
            return Err(ResampleError::invalid_grid(format!(
                "size {size:?} has a zero component"
            )));
        }
        if !spacing.is_valid() {
            return Err(ResampleError::invalid_grid(format!(
                "spacing {:?} must be finite and > 0 on every axis",
                spacing.to_array()
            )));
        }
        if direction.try_inverse().is_none() {
            return Err(ResampleError::invalid_grid(
                "direction matrix is singular".to_string(),
            ));
        }
        Ok(Self {
            size,
            origin,
            spacing,
            direction,
        })
    }

    /// Voxel counts per (x, y, z) axis.
    pub fn size(&self) -> [usize; 3] {
        self.size
    }

    /// Physical coordinate of voxel index (0, 0, 0).
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Physical distance between adjacent voxel centers per axis.
    pub fn spacing(&self) -> &Spacing3 {
        &self.spacing
    }

    /// Orientation of the grid axes in physical space.
    pub fn direction(&self) -> &Direction3 {
        &self.direction
    }

    /// Total voxel count.
    pub fn num_voxels(&self) -> usize {
        self.size[0] * self.size[1] * self.size[2]
    }

    /// Tensor dimensions for data on this grid, in [z, y, x] layout.
    pub fn tensor_dims(&self) -> [usize; 3] {
        [self.size[2], self.size[1], self.size[0]]
    }

    /// Convert a continuous index to a physical point.
    ///
    /// `point = origin + direction * (index * spacing)`
    pub fn index_to_physical(&self, index: &Point3) -> Point3 {
        let scaled = Vector3::new([
            index[0] * self.spacing[0],
            index[1] * self.spacing[1],
            index[2] * self.spacing[2],
        ]);
        self.origin + self.direction * scaled
    }

    /// Convert a physical point to a continuous index.
    ///
    /// `index = (direction^-1 * (point - origin)) / spacing`
    pub fn physical_to_index(&self, point: &Point3) -> Point3 {
        let diff = *point - self.origin;
        // Invertibility is validated at construction.
        let inv = self
            .direction
            .try_inverse()
            .expect("direction validated at construction");
        let rotated = inv * diff;
        Point3::new([
            rotated[0] / self.spacing[0],
            rotated[1] / self.spacing[1],
            rotated[2] / self.spacing[2],
        ])
    }

    /// Physical coordinate of the grid center, index `(size - 1) / 2`.
    pub fn center(&self) -> Point3 {
        let half = Point3::new([
            (self.size[0] as f64 - 1.0) / 2.0,
            (self.size[1] as f64 - 1.0) / 2.0,
            (self.size[2] as f64 - 1.0) / 2.0,
        ]);
        self.index_to_physical(&half)
    }

    /// True if `other` has the same size and its origin, spacing, and
    /// direction agree within `tol`.
    pub fn approx_eq(&self, other: &Grid, tol: f64) -> bool {
        if self.size != other.size {
            return false;
        }
        let origin_ok = (0..3).all(|i| (self.origin[i] - other.origin[i]).abs() <= tol);
        let spacing_ok = (0..3).all(|i| (self.spacing[i] - other.spacing[i]).abs() <= tol);
        let direction_ok = (0..3).all(|r| {
            (0..3).all(|c| (self.direction[(r, c)] - other.direction[(r, c)]).abs() <= tol)
        });
        origin_ok && spacing_ok && direction_ok
    }

    /// All voxel indices of this grid as a `[N, 3]` tensor of (x, y, z)
    /// coordinates, ordered to match a flattened [z, y, x] volume.
    pub fn index_lattice<B: Backend>(&self, device: &B::Device) -> Tensor<B, 2> {
        let [nx, ny, nz] = self.size;

        let z_range = Tensor::<B, 1, burn::tensor::Int>::arange(0..nz as i64, device);
        let y_range = Tensor::<B, 1, burn::tensor::Int>::arange(0..ny as i64, device);
        let x_range = Tensor::<B, 1, burn::tensor::Int>::arange(0..nx as i64, device);

        let total = nx * ny * nz;
        let z_grid = z_range.reshape([nz, 1, 1]).repeat(&[1, ny, nx]).reshape([total]);
        let y_grid = y_range.reshape([1, ny, 1]).repeat(&[nz, 1, nx]).reshape([total]);
        let x_grid = x_range.reshape([1, 1, nx]).repeat(&[nz, ny, 1]).reshape([total]);

        Tensor::cat(
            vec![
                x_grid.float().unsqueeze_dim(1),
                y_grid.float().unsqueeze_dim(1),
                z_grid.float().unsqueeze_dim(1),
            ],
            1,
        )
    }

    /// Batch transform continuous indices `[N, 3]` to physical points `[N, 3]`.
    pub fn index_to_world_tensor<B: Backend>(&self, indices: Tensor<B, 2>) -> Tensor<B, 2> {
        let device = indices.device();
        let origin_tensor = self.origin_tensor::<B>(&device);

        // Row-vector form: P = O + I @ M with M[r, c] = spacing[r] * direction[c, r].
        let mut m_data = Vec::with_capacity(9);
        for r in 0..3 {
            for c in 0..3 {
                m_data.push((self.spacing[r] * self.direction[(c, r)]) as f32);
            }
        }
        let m_tensor =
            Tensor::<B, 2>::from_data(TensorData::new(m_data, Shape::new([3, 3])), &device);

        indices.matmul(m_tensor) + origin_tensor
    }

    /// Batch transform physical points `[N, 3]` to continuous indices `[N, 3]`.
    pub fn world_to_index_tensor<B: Backend>(&self, points: Tensor<B, 2>) -> Tensor<B, 2> {
        let device = points.device();
        let origin_tensor = self.origin_tensor::<B>(&device);

        let inv = self
            .direction
            .try_inverse()
            .expect("direction validated at construction");

        // Row-vector form: I = (P - O) @ T with T[r, c] = inv[c, r] / spacing[c].
        let mut t_data = Vec::with_capacity(9);
        for r in 0..3 {
            for c in 0..3 {
                t_data.push((inv[(c, r)] / self.spacing[c]) as f32);
            }
        }
        let t_tensor =
            Tensor::<B, 2>::from_data(TensorData::new(t_data, Shape::new([3, 3])), &device);

        (points - origin_tensor).matmul(t_tensor)
    }

    fn origin_tensor<B: Backend>(&self, device: &B::Device) -> Tensor<B, 2> {
        let origin_vec: Vec<f32> = (0..3).map(|i| self.origin[i] as f32).collect();
        Tensor::<B, 1>::from_data(TensorData::new(origin_vec, Shape::new([3])), device)
            .reshape([1, 3])
    }
}
