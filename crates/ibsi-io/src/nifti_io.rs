//! NIfTI reading and writing.
//!
//! Volumes on disk are [X, Y, Z]; in memory they are [Z, Y, X] per the
//! ibsi-core convention, with the grid decoded from the sform/qform affine.

use std::path::Path;

use anyhow::{Context, Result};
use burn::tensor::backend::Backend;
use burn::tensor::{Shape, Tensor, TensorData};
use nalgebra::Matrix3;
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, NiftiType, ReaderOptions};
use tracing::debug;

use ibsi_core::{Direction3, Grid, Image, Mask, PixelType, Point3, Spacing3};

/// Decode the voxel-to-world affine from a NIfTI header.
///
/// Prefers the sform, falls back to the qform, and finally to plain pixdim
/// scaling, per the NIfTI-1 standard.
fn decode_affine(header: &NiftiHeader) -> [[f32; 4]; 4] {
    if header.sform_code > 0 {
        [
            header.srow_x,
            header.srow_y,
            header.srow_z,
            [0.0, 0.0, 0.0, 1.0],
        ]
    } else if header.qform_code > 0 {
        let b = header.quatern_b;
        let c = header.quatern_c;
        let d = header.quatern_d;
        let a = (1.0 - (b * b + c * c + d * d).min(1.0)).sqrt();

        let qfac = if header.pixdim[0] == 0.0 {
            1.0
        } else {
            header.pixdim[0]
        };

        let r11 = a * a + b * b - c * c - d * d;
        let r12 = 2.0 * b * c - 2.0 * a * d;
        let r13 = 2.0 * b * d + 2.0 * a * c;

        let r21 = 2.0 * b * c + 2.0 * a * d;
        let r22 = a * a + c * c - b * b - d * d;
        let r23 = 2.0 * c * d - 2.0 * a * b;

        let r31 = 2.0 * b * d - 2.0 * a * c;
        let r32 = 2.0 * c * d + 2.0 * a * b;
        let r33 = a * a + d * d - c * c - b * b;

        let dx = header.pixdim[1];
        let dy = header.pixdim[2];
        let dz = header.pixdim[3] * qfac;

        [
            [r11 * dx, r12 * dy, r13 * dz, header.quatern_x],
            [r21 * dx, r22 * dy, r23 * dz, header.quatern_y],
            [r31 * dx, r32 * dy, r33 * dz, header.quatern_z],
            [0.0, 0.0, 0.0, 1.0],
        ]
    } else {
        let dx = header.pixdim[1];
        let dy = header.pixdim[2];
        let dz = header.pixdim[3];
        [
            [dx, 0.0, 0.0, 0.0],
            [0.0, dy, 0.0, 0.0],
            [0.0, 0.0, dz, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]
    }
}

/// Split an affine into origin, spacing (column norms), and direction
/// cosines, and build the grid for the given size.
fn grid_from_affine(affine: &[[f32; 4]; 4], size: [usize; 3]) -> Result<Grid> {
    let origin = Point3::new([
        affine[0][3] as f64,
        affine[1][3] as f64,
        affine[2][3] as f64,
    ]);

    let mut columns = [nalgebra::Vector3::zeros(); 3];
    let mut spacing = [0.0f64; 3];
    for c in 0..3 {
        let col = nalgebra::Vector3::new(
            affine[0][c] as f64,
            affine[1][c] as f64,
            affine[2][c] as f64,
        );
        spacing[c] = col.norm();
        columns[c] = if spacing[c] > 1e-9 {
            col / spacing[c]
        } else {
            // Degenerate column, fall back to the canonical axis.
            let mut axis = nalgebra::Vector3::zeros();
            axis[c] = 1.0;
            axis
        };
    }

    let direction = Direction3(Matrix3::from_columns(&columns));
    Grid::new(size, origin, Spacing3::new(spacing), direction)
        .context("NIfTI header describes an invalid grid")
}

fn pixel_type_from_nifti(datatype: NiftiType) -> PixelType {
    match datatype {
        NiftiType::Uint8 => PixelType::UInt8,
        NiftiType::Int16 => PixelType::Int16,
        NiftiType::Int32 => PixelType::Int32,
        NiftiType::Float64 => PixelType::Float64,
        _ => PixelType::Float32,
    }
}

/// Shared loader: volume tensor in [Z, Y, X] layout plus grid and stored
/// pixel type.
fn read_volume<B: Backend>(
    path: &Path,
    device: &B::Device,
) -> Result<(Tensor<B, 3>, Grid, PixelType)> {
    let obj = ReaderOptions::new()
        .read_file(path)
        .with_context(|| format!("failed to read NIfTI file {}", path.display()))?;
    let header = obj.header();

    let affine = decode_affine(header);
    let pixel_type = header
        .data_type()
        .map(pixel_type_from_nifti)
        .unwrap_or(PixelType::Float32);

    let volume = obj.into_volume();
    let array = volume
        .into_ndarray::<f32>()
        .context("failed to convert NIfTI volume to ndarray")?;

    let shape = array.shape();
    if shape.len() != 3 {
        anyhow::bail!(
            "expected a 3D NIfTI volume in {}, found {} dimensions",
            path.display(),
            shape.len()
        );
    }
    let size = [shape[0], shape[1], shape[2]];
    let grid = grid_from_affine(&affine, size)?;

    debug!(
        path = %path.display(),
        size = ?size,
        spacing = ?grid.spacing().to_array(),
        pixel_type = %pixel_type,
        "loaded NIfTI volume"
    );

    // The volume comes back Fortran-ordered; normalize before flattening.
    let data_vec = array.as_standard_layout().to_owned().into_raw_vec_and_offset().0;
    let tensor = Tensor::<B, 3>::from_data(
        TensorData::new(data_vec, Shape::new(size)),
        device,
    );
    // Disk layout is [X, Y, Z]; flip to [Z, Y, X].
    let tensor = tensor.permute([2, 1, 0]);

    Ok((tensor, grid, pixel_type))
}

/// Read a NIfTI image. Voxel values are loaded as f32 regardless of the
/// stored type; the stored type is kept on the image.
pub fn read_nifti<B: Backend, P: AsRef<Path>>(path: P, device: &B::Device) -> Result<Image<B>> {
    let (tensor, grid, pixel_type) = read_volume::<B>(path.as_ref(), device)?;
    Ok(Image::new(tensor, grid, pixel_type)?)
}

/// Read a NIfTI segmentation mask.
pub fn read_nifti_mask<B: Backend, P: AsRef<Path>>(
    path: P,
    device: &B::Device,
) -> Result<Mask<B>> {
    let (tensor, grid, _) = read_volume::<B>(path.as_ref(), device)?;
    Ok(Mask::new(tensor, grid)?)
}

/// Write an image to a NIfTI file.
pub fn write_nifti<B: Backend, P: AsRef<Path>>(path: P, image: &Image<B>) -> Result<()> {
    use ndarray::Array3;
    use nifti::writer::WriterOptions;

    // In-memory layout is [Z, Y, X]; disk layout is [X, Y, Z].
    let tensor = image.data().clone().permute([2, 1, 0]);
    let data = tensor.to_data();
    let slice = data
        .as_slice::<f32>()
        .map_err(|e| anyhow::anyhow!("failed to read tensor data: {e:?}"))?;

    let [nx, ny, nz] = image.grid().size();
    let array = Array3::from_shape_vec((nx, ny, nz), slice.to_vec())
        .context("tensor shape does not match grid size")?;

    WriterOptions::new(path.as_ref())
        .write_nifti(&array)
        .map_err(|e| anyhow::anyhow!("failed to write NIfTI file: {e}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;
    use ndarray::Array3;
    use nifti::writer::WriterOptions;
    use tempfile::tempdir;

    type TestBackend = NdArray<f32>;

    fn write_synthetic(path: &Path, nx: usize, ny: usize, nz: usize) -> Result<Vec<f32>> {
        let data: Vec<f32> = (0..nx * ny * nz).map(|v| v as f32).collect();
        let array = Array3::from_shape_vec((nx, ny, nz), data.clone())?;
        WriterOptions::new(path).write_nifti(&array)?;
        Ok(data)
    }

    #[test]
    fn test_read_nifti_shape_and_data() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("test.nii");
        let data = write_synthetic(&file_path, 3, 4, 5)?;

        let device = Default::default();
        let image = read_nifti::<TestBackend, _>(&file_path, &device)?;

        assert_eq!(image.grid().size(), [3, 4, 5]);
        assert_eq!(image.shape(), [5, 4, 3]);

        let tensor_data = image.data().to_data();
        let slice = tensor_data.as_slice::<f32>().unwrap();
        assert_eq!(slice.len(), data.len());
        assert_eq!(slice[0], 0.0);
        // [Z, Y, X] voxel (0, 0, 1) is disk voxel (1, 0, 0), value 1 * 4 * 5.
        assert_eq!(slice[1], 20.0);
        assert_eq!(slice[59], 59.0);

        Ok(())
    }

    #[test]
    fn test_read_nifti_mask() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("mask.nii");
        write_synthetic(&file_path, 2, 2, 2)?;

        let device = Default::default();
        let mask = read_nifti_mask::<TestBackend, _>(&file_path, &device)?;
        assert_eq!(mask.grid().size(), [2, 2, 2]);

        Ok(())
    }

    #[test]
    fn test_write_read_roundtrip() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("roundtrip.nii");

        let device = Default::default();
        let grid = Grid::new(
            [4, 3, 2],
            Point3::origin(),
            Spacing3::uniform(1.0),
            Direction3::identity(),
        )?;
        let data: Vec<f32> = (0..24).map(|v| v as f32).collect();
        let tensor = Tensor::<TestBackend, 3>::from_data(
            TensorData::new(data, Shape::new([2, 3, 4])),
            &device,
        );
        let image = Image::new(tensor, grid, PixelType::Float32)?;

        write_nifti(&file_path, &image)?;
        let loaded = read_nifti::<TestBackend, _>(&file_path, &device)?;

        assert_eq!(loaded.grid().size(), [4, 3, 2]);
        let original = image.data().to_data();
        let original = original.as_slice::<f32>().unwrap();
        let reloaded = loaded.data().to_data();
        let reloaded = reloaded.as_slice::<f32>().unwrap();
        assert_eq!(original, reloaded);

        Ok(())
    }
}
