//! Session error types.

use thiserror::Error;

/// Errors raised by session handling.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Cookie value is not a session identifier
    #[error("Invalid session id: {0}")]
    InvalidSessionId(String),

    /// Preference value outside the accepted set
    #[error("Invalid value for {field}: {value}")]
    InvalidPreference {
        /// Preference name
        field: &'static str,
        /// Rejected value
        value: String,
    },
}

impl SessionError {
    /// Create an invalid preference error
    pub fn invalid_preference(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidPreference {
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
        let err = SessionError::invalid_preference("language", "xx");
        assert_eq!(err.to_string(), "Invalid value for language: xx");
        assert_eq!(
            SessionError::InvalidSessionId("abc".into()).to_string(),
            "Invalid session id: abc"
        );
    }
}
