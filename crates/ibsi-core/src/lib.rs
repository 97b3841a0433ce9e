pub mod error;
pub mod image;
pub mod interpolation;
pub mod resample;
pub mod spatial;

pub use error::{ResampleError, Result};
pub use image::{Grid, Image, Mask, PixelType};
pub use interpolation::{Interpolation, Interpolator};
pub use resample::{
    align_mask_to_image, plan_output_grid, resample_onto_grid, resample_to_spacing,
    resample_to_spacing_with, ResampleObserver, ResampleSettings, TracingObserver,
};
pub use spatial::{Direction3, Point3, Spacing3, Vector3};
