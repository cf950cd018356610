//! Display and notification preferences kept per session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Accepted session timeouts, in minutes.
pub const SESSION_TIMEOUTS: [u32; 4] = [15, 30, 60, 120];

/// Accepted interface languages.
pub const LANGUAGES: [(&str, &str); 4] = [
    ("fr", "Français"),
    ("en", "English"),
    ("de", "Deutsch"),
    ("es", "Español"),
];

/// Accepted display currencies.
pub const CURRENCIES: [(&str, &str); 4] = [
    ("EUR", "Euro (€)"),
    ("USD", "Dollar US ($)"),
    ("GBP", "Livre Sterling (£)"),
    ("CHF", "Franc Suisse (CHF)"),
];

/// Accepted themes.
pub const THEMES: [(&str, &str); 3] = [("light", "Clair"), ("dark", "Sombre"), ("auto", "Automatique")];

/// Accepted date formats.
pub const DATE_FORMATS: [&str; 3] = ["DD/MM/YYYY", "MM/DD/YYYY", "YYYY-MM-DD"];

/// Accepted profile visibilities.
pub const VISIBILITIES: [(&str, &str); 3] = [
    ("private", "Privé"),
    ("public", "Public"),
    ("advisor-only", "Conseiller seulement"),
];

/// Layout of the client-space navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationStyle {
    /// Icon rail on the left
    #[default]
    Vertical,
    /// Text tabs on top
    Horizontal,
}

impl NavigationStyle {
    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationStyle::Vertical => "vertical",
            NavigationStyle::Horizontal => "horizontal",
        }
    }

    /// Label in the settings form
    pub fn label(&self) -> &'static str {
        match self {
            NavigationStyle::Vertical => "Panneau vertical avec icônes",
            NavigationStyle::Horizontal => "Onglets horizontaux avec texte",
        }
    }
}

impl FromStr for NavigationStyle {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vertical" => Ok(NavigationStyle::Vertical),
            "horizontal" => Ok(NavigationStyle::Horizontal),
            _ => Err(SessionError::invalid_preference("navigation_style", s)),
        }
    }
}

impl fmt::Display for NavigationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct Preferences {
    pub email_notifications: bool,
    pub sms_notifications: bool,
    pub push_notifications: bool,
    pub market_alerts: bool,
    pub portfolio_updates: bool,
    pub news_updates: bool,
    pub profile_visibility: String,
    pub data_sharing: bool,
    pub marketing_emails: bool,
    pub language: String,
    pub theme: String,
    pub currency: String,
    pub date_format: String,
    pub navigation_style: NavigationStyle,
    pub two_factor_auth: bool,
    pub session_timeout_minutes: u32,
    pub risk_warnings: bool,
    pub confirm_trades: bool,
    pub auto_invest: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            email_notifications: true,
            sms_notifications: false,
            push_notifications: true,
            market_alerts: true,
            portfolio_updates: true,
            news_updates: false,
            profile_visibility: "private".to_string(),
            data_sharing: false,
            marketing_emails: false,
            language: "fr".to_string(),
            theme: "light".to_string(),
            currency: "EUR".to_string(),
            date_format: "DD/MM/YYYY".to_string(),
            navigation_style: NavigationStyle::Vertical,
            two_factor_auth: false,
            session_timeout_minutes: 30,
            risk_warnings: true,
            confirm_trades: true,
            auto_invest: false,
        }
    }
}

/// Submitted settings form.
///
/// Checkboxes are absent when unticked, so every toggle defaults to `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[allow(missing_docs)]
pub struct PreferencesUpdate {
    #[serde(default, deserialize_with = "checkbox")]
    pub email_notifications: bool,
    #[serde(default, deserialize_with = "checkbox")]
    pub sms_notifications: bool,
    #[serde(default, deserialize_with = "checkbox")]
    pub push_notifications: bool,
    #[serde(default, deserialize_with = "checkbox")]
    pub market_alerts: bool,
    #[serde(default, deserialize_with = "checkbox")]
    pub portfolio_updates: bool,
    #[serde(default, deserialize_with = "checkbox")]
    pub news_updates: bool,
    #[serde(default)]
    pub profile_visibility: Option<String>,
    #[serde(default, deserialize_with = "checkbox")]
    pub data_sharing: bool,
    #[serde(default, deserialize_with = "checkbox")]
    pub marketing_emails: bool,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub date_format: Option<String>,
    #[serde(default)]
    pub navigation_style: Option<String>,
    #[serde(default, deserialize_with = "checkbox")]
    pub two_factor_auth: bool,
    #[serde(default)]
    pub session_timeout: Option<String>,
    #[serde(default, deserialize_with = "checkbox")]
    pub risk_warnings: bool,
    #[serde(default, deserialize_with = "checkbox")]
    pub confirm_trades: bool,
    #[serde(default, deserialize_with = "checkbox")]
    pub auto_invest: bool,
}

fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(matches!(raw.as_str(), "on" | "true" | "1" | "yes"))
}

fn pick(
    field: &'static str,
    value: Option<&str>,
    allowed: &[&str],
    current: &str,
) -> Result<String, SessionError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(current.to_string()),
        Some(v) if allowed.contains(&v) => Ok(v.to_string()),
        Some(v) => Err(SessionError::invalid_preference(field, v)),
    }
}

fn keys(pairs: &[(&'static str, &'static str)]) -> Vec<&'static str> {
    pairs.iter().map(|(k, _)| *k).collect()
}

impl Preferences {
    /// Apply a settings form. Nothing changes if any value is rejected.
    ///
    /// Missing select values keep their current setting.
    pub fn apply(&mut self, update: &PreferencesUpdate) -> Result<(), SessionError> {
        let profile_visibility = pick(
            "profile_visibility",
            update.profile_visibility.as_deref(),
            &keys(&VISIBILITIES),
            &self.profile_visibility,
        )?;
        let language = pick("language", update.language.as_deref(), &keys(&LANGUAGES), &self.language)?;
        let theme = pick("theme", update.theme.as_deref(), &keys(&THEMES), &self.theme)?;
        let currency = pick("currency", update.currency.as_deref(), &keys(&CURRENCIES), &self.currency)?;
        let date_format = pick(
            "date_format",
            update.date_format.as_deref(),
            &DATE_FORMATS,
            &self.date_format,
        )?;
        let navigation_style = match update.navigation_style.as_deref().filter(|v| !v.is_empty()) {
            Some(v) => v.parse()?,
            None => self.navigation_style,
        };
        let session_timeout_minutes = match update.session_timeout.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => v
                .parse::<u32>()
                .ok()
                .filter(|m| SESSION_TIMEOUTS.contains(m))
                .ok_or_else(|| SessionError::invalid_preference("session_timeout", v))?,
            _ => self.session_timeout_minutes,
        };

        *self = Preferences {
            email_notifications: update.email_notifications,
            sms_notifications: update.sms_notifications,
            push_notifications: update.push_notifications,
            market_alerts: update.market_alerts,
            portfolio_updates: update.portfolio_updates,
            news_updates: update.news_updates,
            profile_visibility,
            data_sharing: update.data_sharing,
            marketing_emails: update.marketing_emails,
            language,
            theme,
            currency,
            date_format,
            navigation_style,
            two_factor_auth: update.two_factor_auth,
            session_timeout_minutes,
            risk_warnings: update.risk_warnings,
            confirm_trades: update.confirm_trades,
            auto_invest: update.auto_invest,
        };
        Ok(())
    }
}
