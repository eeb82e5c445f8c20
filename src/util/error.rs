//! Error types for the converter.

use std::path::PathBuf;
use thiserror::Error;

use crate::collada::UniqueId;

/// Main error type for conversion operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A cross-reference table has no entry for the given id
    #[error("Dangling {kind} reference: {id}")]
    DanglingReference { kind: &'static str, id: UniqueId },

    /// Source data uses an encoding the converter cannot express
    #[error("Unsupported encoding: {0}")]
    Unsupported(String),

    /// A source index points outside its vertex data pool
    #[error("{semantic} index {index} out of bounds (count: {count})")]
    IndexOutOfBounds {
        semantic: String,
        index: usize,
        count: usize,
    },

    /// Animation input and reshaped output disagree on sample count
    #[error("Sample count mismatch: {input} input samples, {output} output samples")]
    SampleCountMismatch { input: usize, output: usize },

    /// Malformed animation data
    #[error("Invalid animation data: {0}")]
    InvalidAnimation(String),

    /// Image file could not be read for embedding
    #[error("Failed to read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Image URI could not be resolved against the base path
    #[error("Invalid image URI: {0}")]
    InvalidUri(String),

    /// Conversion was aborted by the caller
    #[error("Conversion cancelled: {0}")]
    Cancelled(String),

    /// Callback invoked outside of a running conversion
    #[error("Invalid writer state: {0}")]
    InvalidState(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an unsupported encoding error.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Create a dangling reference error.
    pub fn dangling(kind: &'static str, id: UniqueId) -> Self {
        Self::DanglingReference { kind, id }
    }

    /// Whether the failed unit can be skipped while the rest of the object converts.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            Self::Unsupported(_) | Self::IndexOutOfBounds { .. } | Self::DanglingReference { .. }
        )
    }
}

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collada::ClassId;

    #[test]
    fn test_error_display() {
        let e = Error::dangling("mesh", UniqueId::new(ClassId::Mesh, 7));
        assert!(e.to_string().contains("mesh"));
        assert!(e.to_string().contains("7"));

        let e = Error::SampleCountMismatch { input: 5, output: 3 };
        assert!(e.to_string().contains("5"));
        assert!(e.to_string().contains("3"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_skippable());
    }

    #[test]
    fn test_skippable() {
        assert!(Error::unsupported("mode").is_skippable());
        assert!(!Error::Cancelled("stop".into()).is_skippable());
    }
}
