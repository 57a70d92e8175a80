//! Domain error types
//!
//! This module defines the error hierarchy for the exporter.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main exporter error type
///
/// This is the primary error type used throughout the application.
/// Anything surfacing as an `ElnError` from the pipeline is fatal for the run;
/// recoverable per-element failures are recorded in the export summary instead.
#[derive(Debug, Error)]
pub enum ElnError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Entry source errors (listing, authentication, element fetches)
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Archive packaging errors
    #[error("Packaging error: {0}")]
    Package(#[from] PackageError),

    /// Export process errors
    #[error("Export error: {0}")]
    Export(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl ElnError {
    /// Whether the error came from reaching or authenticating against the source
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            ElnError::Source(
                SourceError::ConnectionFailed(_)
                    | SourceError::AuthenticationFailed(_)
                    | SourceError::Timeout(_)
            )
        )
    }
}

/// Entry source errors
///
/// Errors that occur when talking to a notebook vendor.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to connect to the source
    #[error("Failed to connect to source: {0}")]
    ConnectionFailed(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Invalid response from server
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Element not found
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Missing total count signal on a listing response
    #[error("Listing response carries no usable total count: {0}")]
    MissingTotalCount(String),
}

impl SourceError {
    /// Map an HTTP status and body to the matching error variant
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => SourceError::AuthenticationFailed(format!("{status} - {message}")),
            404 => SourceError::ElementNotFound(message),
            400..=499 => SourceError::ClientError { status, message },
            _ => SourceError::ServerError { status, message },
        }
    }
}

/// Archive packaging errors
#[derive(Debug, Error)]
pub enum PackageError {
    /// Zip writer failure
    #[error("Failed to write archive: {0}")]
    Zip(String),

    /// Author root directory is missing or not a directory
    #[error("Author root not found: {0}")]
    MissingRoot(String),

    /// Directory traversal failure
    #[error("Failed to walk {path}: {message}")]
    Walk { path: String, message: String },
}

impl From<zip::result::ZipError> for PackageError {
    fn from(err: zip::result::ZipError) -> Self {
        PackageError::Zip(err.to_string())
    }
}

impl From<walkdir::Error> for PackageError {
    fn from(err: walkdir::Error) -> Self {
        PackageError::Walk {
            path: err
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            message: err.to_string(),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for ElnError {
    fn from(err: std::io::Error) -> Self {
        ElnError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ElnError {
    fn from(err: serde_json::Error) -> Self {
        ElnError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ElnError {
    fn from(err: toml::de::Error) -> Self {
        ElnError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<zip::result::ZipError> for ElnError {
    fn from(err: zip::result::ZipError) -> Self {
        ElnError::Package(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eln_error_display() {
        let err = ElnError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_source_error_conversion() {
        let source_err = SourceError::ConnectionFailed("Network error".to_string());
        let err: ElnError = source_err.into();
        assert!(matches!(err, ElnError::Source(_)));
        assert!(err.is_connection());
    }

    #[test]
    fn test_package_error_conversion() {
        let err: ElnError = PackageError::MissingRoot("/tmp/x".to_string()).into();
        assert!(matches!(err, ElnError::Package(_)));
        assert!(!err.is_connection());
    }

    #[test]
    fn test_source_error_from_status() {
        assert!(matches!(
            SourceError::from_status(401, "nope"),
            SourceError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            SourceError::from_status(404, "gone"),
            SourceError::ElementNotFound(_)
        ));
        assert!(matches!(
            SourceError::from_status(400, "bad"),
            SourceError::ClientError { status: 400, .. }
        ));
        assert!(matches!(
            SourceError::from_status(502, "gateway"),
            SourceError::ServerError { status: 502, .. }
        ));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: ElnError = io_err.into();
        assert!(matches!(err, ElnError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: ElnError = json_err.into();
        assert!(matches!(err, ElnError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: ElnError = toml_err.into();
        assert!(matches!(err, ElnError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_eln_error_implements_std_error() {
        let err = ElnError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
