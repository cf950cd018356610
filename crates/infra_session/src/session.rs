//! Session records.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use chrono::{DateTime, Utc};
use portal_core::user::User;
use uuid::Uuid;

use crate::error::SessionError;
use crate::preferences::Preferences;

/// Opaque session identifier carried by the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl FromStr for SessionId {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| SessionError::InvalidSessionId(s.to_string()))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State kept for one browser.
#[derive(Debug, Clone)]
pub struct Session {
    /// Access token issued by the data service
    pub access_token: Option<String>,
    /// Refresh token issued by the data service
    pub refresh_token: Option<String>,
    /// User returned at login
    pub user: Option<User>,
    /// Display preferences
    pub preferences: Preferences,
    /// Creation time
    pub created_at: DateTime<Utc>,
    pub(crate) expires_at: Instant,
}

impl Session {
    pub(crate) fn new(expires_at: Instant) -> Self {
        Self {
            access_token: None,
            refresh_token: None,
            user: None,
            preferences: Preferences::default(),
            created_at: Utc::now(),
            expires_at,
        }
    }

    /// Whether the session holds an access token
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Whether the session has expired at `now`
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}
