//! Declared pixel types.

/// Numeric type of the stored voxel values, as declared by the source file.
///
/// Volumes are held as floating-point tensors in memory regardless of the
/// declared type; the declared type records what the data represents and
/// what resampling produced. Resampled output is always `Float32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelType {
    UInt8,
    Int16,
    Int32,
    Float32,
    Float64,
}

impl PixelType {
    /// True for floating-point pixel types.
    pub fn is_float(&self) -> bool {
        matches!(self, PixelType::Float32 | PixelType::Float64)
    }
}

impl std::fmt::Display for PixelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PixelType::UInt8 => "uint8",
            PixelType::Int16 => "int16",
            PixelType::Int32 => "int32",
            PixelType::Float32 => "float32",
            PixelType::Float64 => "float64",
        };
        f.write_str(name)
    }
}
