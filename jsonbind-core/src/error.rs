//! Error types for jsonbind core operations.

use thiserror::Error;

/// Error raised when a stored scalar does not conform to its declared format.
///
/// Format errors surface at accessor-call time, since the offending value may
/// arrive from external data long after synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Stored text could not be parsed in the declared format.
    #[error("malformed {format} value '{text}': {reason}")]
    Malformed {
        /// Format keyword.
        format: &'static str,
        /// Offending stored text.
        text: String,
        /// Parser message.
        reason: String,
    },

    /// Stored value has the wrong JSON kind for the declared format.
    #[error("{format} expects a {expected} value, found {found}")]
    UnexpectedValue {
        /// Format keyword.
        format: &'static str,
        /// Expected value kind.
        expected: &'static str,
        /// Actual value kind.
        found: &'static str,
    },
}

impl FormatError {
    /// Creates a malformed value error.
    pub fn malformed(
        format: &'static str,
        text: impl Into<String>,
        reason: impl std::fmt::Display,
    ) -> Self {
        Self::Malformed {
            format,
            text: text.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates an unexpected value kind error.
    #[must_use]
    pub const fn unexpected(
        format: &'static str,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Self::UnexpectedValue {
            format,
            expected,
            found,
        }
    }
}

/// Core error type for jsonbind operations.
#[derive(Debug, Error)]
pub enum Error {
    /// JSON text could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A binding was requested but the JSON root is not an object.
    #[error("expected a JSON object, found {found}")]
    NotAnObject {
        /// Kind of the value found instead.
        found: &'static str,
    },

    /// A scalar failed to decode.
    #[error("format error: {0}")]
    Format(#[from] FormatError),
}

/// Result type alias for jsonbind core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_display() {
        let err = FormatError::malformed("date", "1999-13-01", "input is out of range");
        assert_eq!(
            err.to_string(),
            "malformed date value '1999-13-01': input is out of range"
        );

        let err = FormatError::unexpected("utc-millisec", "integer", "string");
        assert_eq!(
            err.to_string(),
            "utc-millisec expects a integer value, found string"
        );
    }

    #[test]
    fn test_error_from_format() {
        let err: Error = FormatError::unexpected("date", "string", "number").into();
        assert!(matches!(err, Error::Format(_)));
    }
}
