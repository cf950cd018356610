//! Data service error types.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while talking to the data service.
///
/// The `Display` text of each variant is what the portal shows or returns
/// in JSON `message` fields.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Lookup returned 404
    #[error("Product not found")]
    NotFound,

    /// Credentials rejected (401)
    #[error("Unauthorized")]
    Unauthorized,

    /// Any other non-success status
    #[error("Backend API returned {status}: {reason}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Canonical reason phrase
        reason: String,
    },

    /// Login or registration refused, with the message to display
    #[error("{0}")]
    Rejected(String),

    /// Body could not be understood
    #[error("{0}")]
    InvalidResponse(String),

    /// Connection refused or timed out
    #[error("Cannot connect to server. Please ensure the backend is running on {url}")]
    Unreachable {
        /// Configured base URL
        url: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// No access token in the session
    #[error("No access token")]
    MissingToken,

    /// Refresh-and-retry gave up; the session has been cleared
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// Refresh endpoint refused the refresh token
    #[error("Token refresh failed")]
    RefreshFailed,

    /// Other transport failure
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl BackendError {
    /// Build a status error from a response status
    pub fn status(status: StatusCode) -> Self {
        Self::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }

    /// Whether the caller should send the user back to the login page
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized | Self::MissingToken | Self::AuthenticationFailed | Self::RefreshFailed
        )
    }
}
