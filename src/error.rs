use crate::types::{Coord, CoordBBox};

/// All error types for the dense/sparse copy engine.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum VoxelError {
    #[error("Invalid region: {0} is empty")]
    InvalidRegion(CoordBBox),
    #[error("Coordinate {coord} lies outside {bbox}")]
    OutOfRange { coord: Coord, bbox: CoordBBox },
    #[error("Offset {offset} out of range for {len} values")]
    OffsetOutOfRange { offset: usize, len: usize },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, VoxelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_strings() {
        let bad = CoordBBox::new(Coord::new(1, 1, 1), Coord::new(-1, 2, 2));
        let e = VoxelError::InvalidRegion(bad);
        assert_eq!(e.to_string(), "Invalid region: [1, 1, 1] -> [-1, 2, 2] is empty");

        let e = VoxelError::OutOfRange {
            coord: Coord::new(9, 0, 0),
            bbox: CoordBBox::new(Coord::splat(0), Coord::splat(7)),
        };
        assert_eq!(
            e.to_string(),
            "Coordinate [9, 0, 0] lies outside [0, 0, 0] -> [7, 7, 7]"
        );

        let e = VoxelError::OffsetOutOfRange { offset: 512, len: 512 };
        assert_eq!(e.to_string(), "Offset 512 out of range for 512 values");

        let e = VoxelError::Config("grain size must be positive".into());
        assert_eq!(e.to_string(), "Configuration error: grain size must be positive");

        let e = VoxelError::ThreadPool("zero threads".into());
        assert_eq!(e.to_string(), "Thread pool error: zero threads");
    }
}
