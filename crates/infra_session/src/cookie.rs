//! Session cookie helpers.
//!
//! The cookie only carries the [`SessionId`]. It is always `HttpOnly` and
//! `SameSite=Lax`; `Secure` is added when the portal runs behind TLS.

use std::time::Duration;

use crate::session::SessionId;

/// Cookie attributes shared by set and clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieSettings {
    /// Cookie name
    pub name: String,
    /// Add the `Secure` attribute
    pub secure: bool,
}

impl CookieSettings {
    /// Create settings for `name`
    pub fn new(name: impl Into<String>, secure: bool) -> Self {
        Self {
            name: name.into(),
            secure,
        }
    }

    /// `Set-Cookie` value opening a session for `max_age`
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use infra_session::cookie::CookieSettings;
    /// use infra_session::SessionId;
    ///
    /// let id: SessionId = "7f1c9a52-6a1e-4c39-9b0e-1f2d3c4b5a69".parse().unwrap();
    /// let header = CookieSettings::new("portal_session", false).build(&id, Duration::from_secs(1800));
    /// assert_eq!(
    ///     header,
    ///     "portal_session=7f1c9a52-6a1e-4c39-9b0e-1f2d3c4b5a69; Path=/; HttpOnly; SameSite=Lax; Max-Age=1800"
    /// );
    /// ```
    pub fn build(&self, id: &SessionId, max_age: Duration) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.name,
            id,
            max_age.as_secs()
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// `Set-Cookie` value deleting the session cookie
    pub fn expire(&self) -> String {
        let mut cookie = format!(
            "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
            self.name
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// Session id from a `Cookie` request header
    pub fn session_id(&self, header: &str) -> Option<SessionId> {
        find_cookie(header, &self.name).and_then(|value| value.parse().ok())
    }
}

/// Value of cookie `name` in a `Cookie` header.
///
/// # Examples
/// ```
/// use infra_session::cookie::find_cookie;
///
/// assert_eq!(find_cookie("a=1; portal_session=abc; b=2", "portal_session"), Some("abc"));
/// assert_eq!(find_cookie("a=1", "portal_session"), None);
/// ```
pub fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"'))
        .filter(|value| !value.is_empty())
}
