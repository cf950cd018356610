//! Structured-product types as shown by the portal.
//!
//! Values here are display-ready: dates are already formatted and barriers
//! are already expressed as percentages. Nothing is computed from them.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// French month abbreviations used for launch dates.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan.", "Fév.", "Mar.", "Avr.", "Mai", "Juin", "Juil.", "Août", "Sep.", "Oct.", "Nov.", "Déc.",
];

/// Placeholder for values the backend did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// Product family.
///
/// # Examples
/// ```
/// use portal_core::Family;
///
/// assert_eq!(Family::from_backend("Reverse Convertible"), Family::Reverse);
/// assert_eq!(Family::from_backend("Warrant"), Family::Undefined);
/// assert_eq!(Family::Cln.as_str(), "cln");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// Autocallable note
    Autocall,
    /// Credit-linked note
    Cln,
    /// Participation certificate
    Participation,
    /// Phoenix (memory coupon autocall)
    Phoenix,
    /// Capital protection note
    Protection,
    /// Reverse convertible
    Reverse,
    /// Family label not recognised
    Undefined,
}

impl Family {
    /// All families in catalog order
    pub const ALL: [Family; 7] = [
        Family::Autocall,
        Family::Cln,
        Family::Participation,
        Family::Phoenix,
        Family::Protection,
        Family::Reverse,
        Family::Undefined,
    ];

    /// Map the family label stored by the data service
    pub fn from_backend(label: &str) -> Self {
        match label {
            "Autocall" => Family::Autocall,
            "CLN" => Family::Cln,
            "Participation" => Family::Participation,
            "Phoenix" => Family::Phoenix,
            "Protection" => Family::Protection,
            "Reverse Convertible" => Family::Reverse,
            _ => Family::Undefined,
        }
    }

    /// Wire value (lowercase)
    pub fn as_str(&self) -> &'static str {
        match self {
            Family::Autocall => "autocall",
            Family::Cln => "cln",
            Family::Participation => "participation",
            Family::Phoenix => "phoenix",
            Family::Protection => "protection",
            Family::Reverse => "reverse",
            Family::Undefined => "undefined",
        }
    }

    /// Human label for filters and headings
    pub fn label(&self) -> &'static str {
        match self {
            Family::Autocall => "Autocall",
            Family::Cln => "CLN",
            Family::Participation => "Participation",
            Family::Phoenix => "Phoenix",
            Family::Protection => "Protection",
            Family::Reverse => "Reverse Convertible",
            Family::Undefined => "Autres",
        }
    }
}

impl FromStr for Family {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Family::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::unknown_value("family", s))
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProductStatus {
    /// In subscription, not yet struck
    #[default]
    #[serde(rename = "Not started")]
    NotStarted,
    /// Live
    Started,
    /// Matured
    Ended,
    /// Called early
    Reimbursed,
}

impl ProductStatus {
    /// All statuses in lifecycle order
    pub const ALL: [ProductStatus; 4] = [
        ProductStatus::NotStarted,
        ProductStatus::Started,
        ProductStatus::Ended,
        ProductStatus::Reimbursed,
    ];

    /// Map a backend status code. Unknown codes read as not started.
    pub fn from_code(code: &str) -> Self {
        match code {
            "LIVE" => ProductStatus::Started,
            "ENDED" => ProductStatus::Ended,
            "REIMB" => ProductStatus::Reimbursed,
            _ => ProductStatus::NotStarted,
        }
    }

    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::NotStarted => "Not started",
            ProductStatus::Started => "Started",
            ProductStatus::Ended => "Ended",
            ProductStatus::Reimbursed => "Reimbursed",
        }
    }

    /// Label printed on product cards
    pub fn label_fr(&self) -> &'static str {
        match self {
            ProductStatus::NotStarted => "NON DEMARRE",
            ProductStatus::Started => "EN COURS DE VIE",
            ProductStatus::Ended => "REMBOURSE A SON TERME",
            ProductStatus::Reimbursed => "REMBOURSE PAR ANTICIPATION",
        }
    }

    /// Short slug used for query strings and CSS classes
    pub fn slug(&self) -> &'static str {
        match self {
            ProductStatus::NotStarted => "not-started",
            ProductStatus::Started => "started",
            ProductStatus::Ended => "ended",
            ProductStatus::Reimbursed => "reimbursed",
        }
    }
}

impl FromStr for ProductStatus {
    type Err = CoreError;

    /// Accepts either the wire value or the slug
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ProductStatus::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s) || st.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::unknown_value("status", s))
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Term-sheet characteristics, all pre-formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct Characteristics {
    pub emetteur: String,
    pub devise: String,
    pub categorie: String,
    pub sous_jacents: String,
    pub barriere_coupon: String,
    pub observations: String,
    pub coupon: String,
    pub niveau_initial: String,
    pub barriere_rappel: String,
    pub barriere_protection: String,
}

/// Desk analysis sections. Any section may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct Analysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyse_risque: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyse_technique: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyse_marche: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyse_performance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommandation: Option<String>,
}

impl Analysis {
    /// Present sections as `(title, text)` pairs in display order
    pub fn sections(&self) -> Vec<(&'static str, &str)> {
        [
            ("Analyse des risques", &self.analyse_risque),
            ("Analyse technique", &self.analyse_technique),
            ("Analyse de marché", &self.analyse_marche),
            ("Analyse de performance", &self.analyse_performance),
            ("Recommandation", &self.recommandation),
        ]
        .into_iter()
        .filter_map(|(title, text)| text.as_deref().map(|t| (title, t)))
        .collect()
    }
}

/// A structured product as served to the pages and the JSON API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Commercial name
    pub name: String,
    /// Launch month, e.g. `Fév. 2025`
    pub start_date: String,
    /// Lookup key
    pub isin: String,
    /// Issuing bank
    pub issuer: String,
    /// Underlying(s), comma separated
    pub underlying: String,
    /// Lifecycle status
    pub status: ProductStatus,
    /// Product family
    pub family: Family,
    /// One-line description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Term-sheet characteristics (detail views only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characteristics: Option<Characteristics>,
    /// Desk analysis (detail views only)
    #[serde(default, rename = "analyseEavest", skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
}

impl Product {
    /// Case-insensitive match on name, ISIN, issuer or underlying
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&self.name, &self.isin, &self.issuer, &self.underlying]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Format a backend launch date as `<month abbreviation> <year>`.
///
/// Accepts plain dates and ISO datetimes; anything else yields `N/A`.
///
/// # Examples
/// ```
/// use portal_core::product::format_launch_date;
///
/// assert_eq!(format_launch_date(Some("2025-02-14")), "Fév. 2025");
/// assert_eq!(format_launch_date(Some("2024-08-01T09:30:00Z")), "Août 2024");
/// assert_eq!(format_launch_date(Some("soon")), "N/A");
/// assert_eq!(format_launch_date(None), "N/A");
/// ```
pub fn format_launch_date(raw: Option<&str>) -> String {
    raw.and_then(|s| s.trim().get(..10))
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        .map(|date| {
            format!(
                "{} {}",
                MONTH_ABBREVIATIONS[date.month0() as usize],
                date.year()
            )
        })
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Format a barrier stored as a fraction of the initial level.
///
/// # Examples
/// ```
/// use portal_core::product::format_barrier;
///
/// assert_eq!(format_barrier(Some(0.65)), "65%");
/// assert_eq!(format_barrier(Some(0.0)), "N/A");
/// assert_eq!(format_barrier(None), "N/A");
/// ```
pub fn format_barrier(fraction: Option<f64>) -> String {
    match fraction {
        Some(f) if f != 0.0 && f.is_finite() => format!("{}%", (f * 100.0).round() as i64),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Format a rate already expressed in percent.
///
/// # Examples
/// ```
/// use portal_core::product::format_rate;
///
/// assert_eq!(format_rate(Some(8.5)), "8.5%");
/// assert_eq!(format_rate(Some(8.0)), "8%");
/// assert_eq!(format_rate(None), "N/A");
/// ```
pub fn format_rate(percent: Option<f64>) -> String {
    match percent {
        Some(p) if p.is_finite() => format!("{}%", p),
        _ => NOT_AVAILABLE.to_string(),
    }
}
