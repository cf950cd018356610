//! ISIN lookup keys.
//!
//! The portal never interprets an ISIN: it is an opaque key forwarded to the
//! data service. The only guarantee [`Isin`] gives is that the value is safe
//! to embed in a URL path segment.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// ISIN as the caller wrote it, minus surrounding whitespace.
///
/// Casing is preserved: the data service matches keys exactly.
///
/// # Examples
/// ```
/// use portal_core::Isin;
///
/// let isin: Isin = " fr0012345678 ".parse().unwrap();
/// assert_eq!(isin.as_str(), "fr0012345678");
///
/// assert!("".parse::<Isin>().is_err());
/// assert!("FR00/../admin".parse::<Isin>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Isin(String);

impl Isin {
    /// Trim a raw ISIN and check it fits in a URL path segment
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let key = raw.trim();
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CoreError::InvalidIsin(raw.to_string()));
        }
        Ok(Self(key.to_string()))
    }

    /// Borrow the key
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Isin {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Isin {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Isin> for String {
    fn from(value: Isin) -> Self {
        value.0
    }
}

impl fmt::Display for Isin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Isin {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
