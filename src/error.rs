//! Central error types for emberpoint
//!
//! One crate-wide error enum plus a result alias. Loading errors are fatal:
//! a hierarchy that fails validation never reaches the traversal worker, so
//! the hot path carries no per-node recovery logic. Lock contention between
//! the worker and a consumer is part of normal operation and is never
//! surfaced through these types.

use std::path::PathBuf;

/// Result type used throughout the crate
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid hierarchy header: {0}")]
    InvalidHeader(String),

    #[error("Unsupported bounding volume tag: {0}")]
    UnsupportedBoundingVolume(u32),

    #[error("Hierarchy offset {offset} out of bounds ({extent} words mapped)")]
    NodeOutOfBounds { offset: u32, extent: usize },

    #[error("Point offset {offset} out of bounds ({extent} floats mapped)")]
    PointOutOfBounds { offset: u32, extent: usize },

    #[error("Node at depth {depth} exceeds header depth {max_depth}")]
    DepthExceeded { depth: u32, max_depth: u32 },

    #[error("Corrupted hierarchy data: {0}")]
    CorruptedData(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl EngineError {
    /// Attach a path to an I/O failure
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_path() {
        let error = EngineError::io(
            "/tmp/cloud.bin",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        let message = error.to_string();
        assert!(message.contains("/tmp/cloud.bin"));
        assert!(message.contains("missing"));
    }

    #[test]
    fn test_bounds_error_reports_extent() {
        let error = EngineError::NodeOutOfBounds {
            offset: 900,
            extent: 128,
        };
        assert_eq!(
            error.to_string(),
            "Hierarchy offset 900 out of bounds (128 words mapped)"
        );
    }
}
