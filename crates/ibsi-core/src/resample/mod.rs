//! Center-aligned resampling of images and masks.
//!
//! Resampling plans a new grid from a target spacing, places it so that the
//! physical center of the volume is preserved, and samples the input data
//! onto it. Images and masks are resampled in lock-step so they stay
//! spatially registered.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use tracing::{debug, info};

use crate::error::{ResampleError, Result};
use crate::image::{Grid, Image, Mask, PixelType};
use crate::interpolation::Interpolation;
use crate::spatial::Vector3;

/// Threshold applied to a linearly resampled mask to recover binary labels.
const MASK_THRESHOLD: f64 = 0.5;

/// Tolerance for the image/mask grid agreement check.
const GRID_TOLERANCE: f64 = 1e-6;

/// Settings for a resampling run.
#[derive(Debug, Clone)]
pub struct ResampleSettings {
    /// Target spacing per (x, y, z) axis, in mm. A zero entry keeps the
    /// input spacing on that axis.
    pub target_spacing: [f64; 3],
    /// Interpolation used for the image. The mask is always resampled
    /// linearly and thresholded.
    pub interpolation: Interpolation,
    /// Number of decimals to round resampled image intensities to.
    /// `None` leaves intensities untouched.
    pub gray_value_precision: Option<u32>,
}

impl ResampleSettings {
    /// Settings with the given target spacing, linear interpolation, and no
    /// intensity rounding.
    pub fn new(target_spacing: [f64; 3]) -> Self {
        Self {
            target_spacing,
            interpolation: Interpolation::default(),
            gray_value_precision: None,
        }
    }

    /// Set the image interpolation method.
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Round resampled image intensities to `decimals` places.
    pub fn with_gray_value_precision(mut self, decimals: u32) -> Self {
        self.gray_value_precision = Some(decimals);
        self
    }
}

/// Hook into the resampling pipeline.
///
/// Callers that want to record planned grids or verify center alignment
/// implement this; [`TracingObserver`] logs through `tracing` and is the
/// usual choice.
pub trait ResampleObserver {
    /// Called once the output grid is planned, before any data is sampled.
    fn grid_planned(&mut self, _input: &Grid, _output: &Grid) {}

    /// Called with the difference between output and input volume centers.
    /// Exactly zero up to floating point for a correctly planned grid.
    fn center_residual(&mut self, _residual: Vector3) {}
}

/// Observer that reports through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ResampleObserver for TracingObserver {
    fn grid_planned(&mut self, input: &Grid, output: &Grid) {
        info!(
            input_size = ?input.size(),
            input_spacing = ?input.spacing().to_array(),
            output_size = ?output.size(),
            output_spacing = ?output.spacing().to_array(),
            "resampling volume, aligning centers"
        );
    }

    fn center_residual(&mut self, residual: Vector3) {
        debug!(residual = ?residual.to_array(), "center alignment residual");
    }
}

/// Plan the output grid for `input` at `target_spacing`.
///
/// Zero spacing entries inherit the input spacing on that axis. The output
/// size is `ceil(n0 * s0 / s1)` per axis, and the origin is shifted so the
/// physical center of the output volume coincides with the input's:
///
/// `origin1 = origin0 + direction * (((n0 - 1) * s0 - (n1 - 1) * s1) / 2)`
pub fn plan_output_grid(input: &Grid, target_spacing: [f64; 3]) -> Result<Grid> {
    if target_spacing
        .iter()
        .any(|&s| !s.is_finite() || s < 0.0)
    {
        return Err(ResampleError::InvalidSpacing {
            spacing: target_spacing,
        });
    }

    let input_spacing = input.spacing();
    let mut resolved = [0.0f64; 3];
    for i in 0..3 {
        resolved[i] = if target_spacing[i] == 0.0 {
            input_spacing[i]
        } else {
            target_spacing[i]
        };
    }

    let input_size = input.size();
    let mut output_size = [0usize; 3];
    let mut shift = Vector3::zeros();
    for i in 0..3 {
        let n0 = input_size[i] as f64;
        let s0 = input_spacing[i];
        let s1 = resolved[i];
        // Ratio first: when s0 == s1 the ratio is exactly 1.0, so the ceil
        // cannot overshoot and an identity resample keeps its size.
        let n1 = (n0 * (s0 / s1)).ceil();
        if !n1.is_finite() || n1 < 1.0 {
            return Err(ResampleError::invalid_grid(format!(
                "output size on axis {i} is not representable (spacing {s0} -> {s1})"
            )));
        }
        output_size[i] = n1 as usize;
        shift[i] = 0.5 * ((n0 - 1.0) * s0 - (n1 - 1.0) * s1);
    }

    let origin = *input.origin() + *input.direction() * shift;
    Grid::new(
        output_size,
        origin,
        crate::spatial::Spacing3::new(resolved),
        *input.direction(),
    )
}

/// Sample `data` (living on `input`) at every voxel of `output`.
fn resample_tensor<B: Backend>(
    data: &Tensor<B, 3>,
    input: &Grid,
    output: &Grid,
    interpolation: Interpolation,
) -> Result<Tensor<B, 3>> {
    let device = data.device();
    let lattice = output.index_lattice::<B>(&device);
    let world = output.index_to_world_tensor(lattice);
    let source_indices = input.world_to_index_tensor(world);
    let values = interpolation.interpolate(data, source_indices)?;
    Ok(values.reshape(output.tensor_dims()))
}

/// Resample `image` onto `target`, producing Float32 intensities.
pub fn resample_onto_grid<B: Backend>(
    image: &Image<B>,
    target: &Grid,
    interpolation: Interpolation,
) -> Result<Image<B>> {
    let data = resample_tensor(image.data(), image.grid(), target, interpolation)?;
    Image::new(data, target.clone(), PixelType::Float32)
}

/// Resample `mask` onto the grid of `image` with nearest-neighbor sampling.
///
/// Used before resampling when the mask header disagrees with the image
/// by more than round-off. Label values are preserved exactly.
pub fn align_mask_to_image<B: Backend>(mask: &Mask<B>, image: &Image<B>) -> Result<Mask<B>> {
    let target = image.grid();
    if mask.grid().approx_eq(target, GRID_TOLERANCE) {
        return Mask::new(mask.data().clone(), target.clone());
    }
    info!(
        mask_size = ?mask.grid().size(),
        image_size = ?target.size(),
        "aligning mask onto image grid with nearest-neighbor sampling"
    );
    let data = resample_tensor(mask.data(), mask.grid(), target, Interpolation::Nearest)?;
    Mask::new(data, target.clone())
}

/// Resample an image and its mask to `settings.target_spacing`, keeping the
/// physical volume center fixed. Logs through [`TracingObserver`].
pub fn resample_to_spacing<B: Backend>(
    image: &Image<B>,
    mask: &Mask<B>,
    settings: &ResampleSettings,
) -> Result<(Image<B>, Mask<B>)> {
    resample_to_spacing_with(image, mask, settings, &mut TracingObserver)
}

/// Resample an image and its mask to `settings.target_spacing` with an
/// explicit observer.
///
/// The image is sampled with `settings.interpolation` and cast to Float32;
/// the mask is sampled linearly and thresholded at 0.5, so the output mask
/// is strictly binary. Fails with [`ResampleError::GridMismatch`] when the
/// image and mask grids disagree; use [`align_mask_to_image`] first in that
/// case.
pub fn resample_to_spacing_with<B: Backend>(
    image: &Image<B>,
    mask: &Mask<B>,
    settings: &ResampleSettings,
    observer: &mut dyn ResampleObserver,
) -> Result<(Image<B>, Mask<B>)> {
    if !image.grid().approx_eq(mask.grid(), GRID_TOLERANCE) {
        return Err(ResampleError::grid_mismatch(format!(
            "image grid (size {:?}, origin {:?}) and mask grid (size {:?}, origin {:?}) disagree",
            image.grid().size(),
            image.grid().origin().to_array(),
            mask.grid().size(),
            mask.grid().origin().to_array(),
        )));
    }

    let input = image.grid().clone();
    let output = plan_output_grid(&input, settings.target_spacing)?;
    observer.grid_planned(&input, &output);

    let input_center = input.center();

    let mut image_data =
        resample_tensor(image.data(), &input, &output, settings.interpolation)?;
    if let Some(decimals) = settings.gray_value_precision {
        let scale = 10f64.powi(decimals as i32);
        image_data = image_data.mul_scalar(scale).round().div_scalar(scale);
    }
    let resampled_image = Image::new(image_data, output.clone(), PixelType::Float32)?;

    let mask_data = resample_tensor(mask.data(), &input, &output, Interpolation::Linear)?;
    let mask_data = mask_data.greater_equal_elem(MASK_THRESHOLD).float();
    let resampled_mask = Mask::new(mask_data, output.clone())?;

    observer.center_residual(output.center() - input_center);

    Ok((resampled_image, resampled_mask))
}
