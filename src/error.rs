//! Error handling for Sound Edit
//!
//! Every error carries an error code and, where it makes sense,
//! recovery suggestions for the person at the keyboard.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Sound Edit operations
pub type Result<T> = std::result::Result<T, SoundEditError>;

/// Main error type for Sound Edit operations
#[derive(Error, Debug)]
pub enum SoundEditError {
    // Service Errors
    #[error("{operation} failed: {status} {reason}")]
    RequestFailed {
        operation: String,
        status: u16,
        reason: String,
    },

    #[error("Cannot reach audio service: {message}")]
    Connection { message: String },

    #[error("Audio service timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid response for {operation}: {reason}")]
    InvalidResponse { operation: String, reason: String },

    #[error("Id cannot be used in a request path: {id:?}")]
    InvalidId { id: String },

    // File Errors
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported audio type for {path}: {mime}")]
    UnsupportedAudioType { path: PathBuf, mime: String },

    // Configuration Errors
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SoundEditError {
    /// Build a `RequestFailed` error from a response status line.
    pub fn request_failed(operation: &str, status: u16, reason: impl Into<String>) -> Self {
        SoundEditError::RequestFailed {
            operation: operation.to_string(),
            status,
            reason: reason.into(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            SoundEditError::RequestFailed { .. } => "REQUEST_FAILED",
            SoundEditError::Connection { .. } => "CONNECTION_ERROR",
            SoundEditError::Timeout { .. } => "TIMEOUT",
            SoundEditError::InvalidResponse { .. } => "INVALID_RESPONSE",
            SoundEditError::InvalidId { .. } => "INVALID_ID",
            SoundEditError::FileNotFound { .. } => "FILE_NOT_FOUND",
            SoundEditError::UnsupportedAudioType { .. } => "UNSUPPORTED_AUDIO_TYPE",
            SoundEditError::InvalidConfig { .. } => "INVALID_CONFIG",
            SoundEditError::Io(_) => "IO_ERROR",
            SoundEditError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable by the caller
    pub fn is_recoverable(&self) -> bool {
        match self {
            SoundEditError::Connection { .. } => true,
            SoundEditError::Timeout { .. } => true,
            SoundEditError::FileNotFound { .. } => true,
            SoundEditError::UnsupportedAudioType { .. } => true,
            SoundEditError::RequestFailed { status, .. } => *status == 404 || *status >= 500,
            _ => false,
        }
    }

    /// HTTP status of a failed request, if this error came from one
    pub fn status(&self) -> Option<u16> {
        match self {
            SoundEditError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            SoundEditError::Connection { .. } => vec![
                "Check that the audio service is running",
                "Verify SOUNDEDIT_API_URL points at the service",
            ],
            SoundEditError::Timeout { .. } => vec![
                "The service may be busy processing audio",
                "Raise SOUNDEDIT_TIMEOUT_MS for long conversions",
            ],
            SoundEditError::RequestFailed { status: 404, .. } => vec![
                "The file or project id may have been deleted",
                "List files or projects to find a valid id",
            ],
            SoundEditError::UnsupportedAudioType { .. } => vec![
                "Convert the file to WAV, MP3 or FLAC first",
                "Supported formats: MP3, WAV, FLAC, AAC, OGG, M4A, WMA, OPUS, AIFF",
            ],
            SoundEditError::InvalidId { .. } => vec![
                "Ids may not contain '/', '\\', '?', '#', '%' or whitespace",
                "List files or projects to copy the exact id",
            ],
            SoundEditError::FileNotFound { .. } => vec![
                "Check the file path is correct",
                "Verify the file hasn't been moved or deleted",
            ],
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = SoundEditError::FileNotFound {
            path: PathBuf::from("test.wav"),
        };
        assert_eq!(err.error_code(), "FILE_NOT_FOUND");

        let err = SoundEditError::request_failed("List projects", 500, "Internal Server Error");
        assert_eq!(err.error_code(), "REQUEST_FAILED");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_request_failed_message() {
        let err = SoundEditError::request_failed("Delete file", 404, "Not Found");
        assert_eq!(err.to_string(), "Delete file failed: 404 Not Found");
    }

    #[test]
    fn test_recovery_suggestions() {
        let err = SoundEditError::request_failed("Load project", 404, "Not Found");
        assert!(err.is_recoverable());
        assert!(!err.recovery_suggestions().is_empty());

        let err = SoundEditError::request_failed("Create project", 422, "Unprocessable Entity");
        assert!(!err.is_recoverable());
        assert!(err.recovery_suggestions().is_empty());
    }
}
