//! Error types for Sabio operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for Sabio operations.
///
/// Covers configuration validation at model construction, buffer shape
/// mismatches during training/prediction, and model file I/O.
///
/// # Examples
///
/// ```
/// use sabio::error::SabioError;
///
/// let err = SabioError::DimensionMismatch {
///     expected: "1568 input bits".to_string(),
///     actual: "784".to_string(),
/// };
/// assert!(err.to_string().contains("dimension mismatch"));
/// ```
#[derive(Debug)]
pub enum SabioError {
    /// Buffer dimensions don't match what the operation expects.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Invalid hyperparameter value provided.
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// I/O error (file not found, truncated read, permission denied, etc.).
    Io(std::io::Error),

    /// Invalid or inconsistent model file contents.
    FormatError {
        /// Error description
        message: String,
    },

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for SabioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SabioError::DimensionMismatch { expected, actual } => {
                write!(f, "dimension mismatch: expected {expected}, got {actual}")
            }
            SabioError::InvalidHyperparameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid hyperparameter: {param} = {value}, expected {constraint}"
                )
            }
            SabioError::Io(e) => write!(f, "I/O error: {e}"),
            SabioError::FormatError { message } => {
                write!(f, "Invalid model format: {message}")
            }
            SabioError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for SabioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SabioError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SabioError {
    fn from(err: std::io::Error) -> Self {
        SabioError::Io(err)
    }
}

impl From<&str> for SabioError {
    fn from(msg: &str) -> Self {
        SabioError::Other(msg.to_string())
    }
}

/// Convenience result type for Sabio operations.
pub type Result<T> = std::result::Result<T, SabioError>;
