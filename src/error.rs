//! Unified error types for chatscrub.
//!
//! The cleaning core ([`transform`](crate::core::transform)) is total over its
//! input and never fails. Errors only arise at the edges: reading an export,
//! decoding its JSON, or interpreting user configuration.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatscrub operations.
///
/// # Example
///
/// ```rust
/// use chatscrub::error::Result;
/// use chatscrub::Transcript;
///
/// fn load() -> Result<Transcript> {
///     Transcript::from_json_str(r#"{"messages": []}"#)
/// }
/// # assert!(load().is_ok());
/// ```
pub type Result<T> = std::result::Result<T, ChatscrubError>;

/// The error type for all chatscrub operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatscrubError {
    /// An I/O error occurred while reading an export or writing output.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The input could not be read from the given path.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// The path that failed to open
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// JSON decoding error.
    ///
    /// Raised when the export is not valid JSON or a message record has a
    /// field of the wrong type.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The export parsed as JSON but does not have the expected shape.
    ///
    /// The most common case is a missing or non-array `messages` field.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// The format that was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// A timezone setting could not be understood.
    #[error("Invalid timezone '{input}'. Expected one of: local, utc, +HH:MM, -HH:MM")]
    InvalidTimezone {
        /// The rejected input
        input: String,
    },

    /// Output was not valid UTF-8.
    #[error("UTF-8 encoding error in {context}: {source}")]
    Utf8 {
        /// Description of where the error occurred
        context: String,
        /// The underlying UTF-8 error
        #[source]
        source: std::string::FromUtf8Error,
    },
}

impl From<std::string::FromUtf8Error> for ChatscrubError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        ChatscrubError::Utf8 {
            context: "input conversion".to_string(),
            source: err,
        }
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatscrubError {
    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        ChatscrubError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// The error raised when an export lacks a list-shaped `messages` field.
    pub fn missing_messages() -> Self {
        Self::invalid_format("chat export JSON", "'messages' array missing")
    }

    /// Creates an invalid timezone error.
    pub fn invalid_timezone(input: impl Into<String>) -> Self {
        ChatscrubError::InvalidTimezone {
            input: input.into(),
        }
    }

    /// Creates a read error carrying the offending path.
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ChatscrubError::Read {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if the input had the wrong shape or was not valid JSON.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            ChatscrubError::InvalidFormat { .. } | ChatscrubError::Json(_)
        )
    }

    /// Returns `true` if this is an I/O error.
    pub fn is_io_error(&self) -> bool {
        matches!(self, ChatscrubError::Io(_) | ChatscrubError::Read { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_messages_display() {
        let err = ChatscrubError::missing_messages();
        assert_eq!(
            err.to_string(),
            "Invalid chat export JSON format: 'messages' array missing"
        );
        assert!(err.is_format_error());
        assert!(!err.is_io_error());
    }

    #[test]
    fn test_invalid_timezone_display() {
        let err = ChatscrubError::invalid_timezone("mars");
        assert!(err.to_string().contains("'mars'"));
        assert!(err.to_string().contains("+HH:MM"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: ChatscrubError = io_err.into();
        assert!(err.is_io_error());
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_read_error_includes_path() {
        let err = ChatscrubError::read(
            "missing.json",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.is_io_error());
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_json_error_is_format_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: ChatscrubError = json_err.into();
        assert!(err.is_format_error());
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ChatscrubError>();
    }
}
