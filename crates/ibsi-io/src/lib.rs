pub mod nifti_io;

pub use nifti_io::{read_nifti, read_nifti_mask, write_nifti};
