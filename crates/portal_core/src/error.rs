//! Error types for the domain layer.

use thiserror::Error;

/// Errors raised while building domain values from untrusted input.
///
/// # Examples
/// ```
/// use portal_core::CoreError;
///
/// let err = CoreError::InvalidIsin("FR00/123".to_string());
/// assert_eq!(err.to_string(), "Invalid ISIN: FR00/123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// ISIN was empty or contained characters outside `[A-Z0-9]`
    #[error("Invalid ISIN: {0}")]
    InvalidIsin(String),

    /// Unknown role name
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Unknown navigation style, document category or similar enum value
    #[error("Unknown value for {field}: {value}")]
    UnknownValue {
        /// Name of the field being parsed
        field: &'static str,
        /// Rejected input
        value: String,
    },
}

impl CoreError {
    /// Create an unknown-value error
    pub fn unknown_value(field: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownValue {
            field,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::unknown_value("navigation_style", "diagonal");
        assert_eq!(
            err.to_string(),
            "Unknown value for navigation_style: diagonal"
        );

        let err = CoreError::UnknownRole("root".to_string());
        assert!(err.to_string().contains("root"));
    }
}
