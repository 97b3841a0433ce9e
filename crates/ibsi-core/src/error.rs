//! Error types for grid and resampling operations.

use thiserror::Error;

/// Main error type for grid construction and resampling.
#[derive(Error, Debug)]
pub enum ResampleError {
    /// A target spacing entry is negative or not a number.
    #[error("invalid target spacing {spacing:?}: entries must be positive or zero")]
    InvalidSpacing { spacing: [f64; 3] },

    /// Image and mask grids differ before resampling.
    #[error("grid mismatch: {0}")]
    GridMismatch(String),

    /// A grid is degenerate (non-positive size, non-finite or non-positive
    /// spacing, singular direction matrix).
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// Failure in the interpolation backend.
    #[error("interpolation error: {0}")]
    Interpolation(String),
}

/// Result type for grid and resampling operations.
pub type Result<T> = std::result::Result<T, ResampleError>;

impl ResampleError {
    /// Create a grid mismatch error.
    pub fn grid_mismatch(msg: impl Into<String>) -> Self {
        Self::GridMismatch(msg.into())
    }

    /// Create an invalid grid error.
    pub fn invalid_grid(msg: impl Into<String>) -> Self {
        Self::InvalidGrid(msg.into())
    }

    /// Create an interpolation error.
    pub fn interpolation(msg: impl Into<String>) -> Self {
        Self::Interpolation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ResampleError::InvalidSpacing {
            spacing: [-1.0, 2.0, 2.0],
        };
        assert!(err.to_string().contains("positive or zero"));

        let err = ResampleError::grid_mismatch("sizes differ");
        assert_eq!(err.to_string(), "grid mismatch: sizes differ");

        let err = ResampleError::interpolation("volume data is not f32");
        assert_eq!(
            err.to_string(),
            "interpolation error: volume data is not f32"
        );
    }
}
