//! Error types for notepage library.

use std::io;
use thiserror::Error;

/// Result type alias for notepage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while paginating a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The measurement oracle failed. Fatal for the current pagination run.
    #[error("Measurement failed: {0}")]
    Measure(String),

    /// The layout configuration cannot be used for measurement.
    #[error("Invalid layout configuration: {0}")]
    InvalidConfig(String),

    /// An image reference could not be resolved.
    #[error("Image resolution error: {0}")]
    ImageResolve(String),

    /// Error while rendering pages (JSON, text, Markdown).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Measure("layout engine unavailable".to_string());
        assert_eq!(err.to_string(), "Measurement failed: layout engine unavailable");

        let err = Error::InvalidConfig("font size must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid layout configuration: font size must be positive"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Render(_)));
    }
}
