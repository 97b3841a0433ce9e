//! Image, mask, and grid types.
//!
//! This module provides the volumetric data types handed to the resampler:
//! a validated sampling grid, an intensity image, and a label mask.

pub mod grid;
pub mod image;
pub mod mask;
pub mod pixel;

pub use grid::Grid;
pub use image::Image;
pub use mask::Mask;
pub use pixel::PixelType;
