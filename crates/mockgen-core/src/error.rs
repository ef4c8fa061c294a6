//! Error types and error code constants for mockgen.
//!
//! Synthesis itself cannot fail: every input shape maps to some output, and
//! shapes without an artifact produce empty text. Errors only arise at the
//! front door, while loading and decoding a type description.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments or a malformed type description
//! - `3`: Input file not found
//! - `10`: Internal errors (I/O failures, bugs)

use std::fmt;

use thiserror::Error;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes for JSON output; also used as process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments or input model.
    InvalidArguments = 2,
    /// Input could not be located.
    ResolutionError = 3,
    /// Internal errors (bugs, unexpected state, I/O).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum MockgenError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments {
        message: String,
        details: Option<serde_json::Value>,
    },

    /// The type description could not be decoded.
    #[error("invalid model at line {line}, column {column}: {message}")]
    InvalidModel {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("file not found: {path}")]
    FileNotFound { path: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {message}")]
    InternalError { message: String },
}

impl From<&MockgenError> for OutputErrorCode {
    fn from(err: &MockgenError) -> Self {
        match err {
            MockgenError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            MockgenError::InvalidModel { .. } => OutputErrorCode::InvalidArguments,
            MockgenError::FileNotFound { .. } => OutputErrorCode::ResolutionError,
            MockgenError::Io(_) => OutputErrorCode::InternalError,
            MockgenError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<serde_json::Error> for MockgenError {
    fn from(err: serde_json::Error) -> Self {
        MockgenError::InvalidModel {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl MockgenError {
    pub fn invalid_args(message: impl Into<String>) -> Self {
        MockgenError::InvalidArguments {
            message: message.into(),
            details: None,
        }
    }

    pub fn invalid_args_with_details(
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        MockgenError::InvalidArguments {
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        MockgenError::FileNotFound { path: path.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        MockgenError::InternalError {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

// ============================================================================
// Tests
// ============================================================================
