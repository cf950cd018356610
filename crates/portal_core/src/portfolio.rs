//! Client holdings, documents and alerts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::product::Product;

/// Kind of document attached to a holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Term sheet
    TermSheet,
    /// Distributor remuneration letter
    RemunerationLetter,
    /// Marketing brochure
    CommercialBrochure,
}

impl DocumentKind {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::TermSheet => "Term Sheet",
            DocumentKind::RemunerationLetter => "Lettre de Rémunération",
            DocumentKind::CommercialBrochure => "Brochure Commerciale",
        }
    }
}

/// Document attached to a holding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct ProductDocument {
    pub name: String,
    pub kind: DocumentKind,
    pub url: String,
    pub size: String,
}

/// Dated valuation point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformancePoint {
    /// ISO date
    pub date: String,
    /// Valuation
    pub value: f64,
}

/// Coupon payment state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CouponStatus {
    /// Paid
    #[serde(rename = "Versé")]
    Paid,
    /// Scheduled
    #[serde(rename = "Prévu")]
    Scheduled,
    /// Cancelled (barrier missed)
    #[serde(rename = "Annulé")]
    Cancelled,
}

impl CouponStatus {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            CouponStatus::Paid => "Versé",
            CouponStatus::Scheduled => "Prévu",
            CouponStatus::Cancelled => "Annulé",
        }
    }
}

/// Coupon line of a holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct Coupon {
    pub date: String,
    pub rate: String,
    pub amount: f64,
    pub status: CouponStatus,
}

/// Detailed lifecycle status of a holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HoldingStatus {
    /// Running
    #[serde(rename = "En cours")]
    Running,
    /// Reached maturity
    #[serde(rename = "À maturité")]
    AtMaturity,
    /// Called
    #[serde(rename = "Rappelé")]
    Called,
    /// Redeemed
    #[serde(rename = "Remboursé")]
    Redeemed,
    /// Trading suspended
    #[serde(rename = "Suspendu")]
    Suspended,
}

impl HoldingStatus {
    /// Every status, in display order
    pub const ALL: [HoldingStatus; 5] = [
        HoldingStatus::Running,
        HoldingStatus::AtMaturity,
        HoldingStatus::Called,
        HoldingStatus::Redeemed,
        HoldingStatus::Suspended,
    ];

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            HoldingStatus::Running => "En cours",
            HoldingStatus::AtMaturity => "À maturité",
            HoldingStatus::Called => "Rappelé",
            HoldingStatus::Redeemed => "Remboursé",
            HoldingStatus::Suspended => "Suspendu",
        }
    }

    /// CSS modifier
    pub fn css_class(&self) -> &'static str {
        match self {
            HoldingStatus::Running => "status-running",
            HoldingStatus::AtMaturity => "status-maturity",
            HoldingStatus::Called => "status-called",
            HoldingStatus::Redeemed => "status-redeemed",
            HoldingStatus::Suspended => "status-suspended",
        }
    }
}

impl FromStr for HoldingStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HoldingStatus::ALL
            .into_iter()
            .find(|st| st.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::unknown_value("detailed_status", s))
    }
}

impl fmt::Display for HoldingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A product position in the client's portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct Holding {
    pub product: Product,
    pub quantity: u32,
    pub purchase_date: String,
    pub purchase_price: f64,
    pub current_value: f64,
    pub expiry_date: String,
    pub detailed_status: HoldingStatus,
    pub documents: Vec<ProductDocument>,
    pub performance_history: Vec<PerformancePoint>,
    pub coupons: Vec<Coupon>,
    /// Term, e.g. `3 ans`
    pub period: String,
    /// Sub-portfolio bucket, e.g. `Croissance`
    pub sub_portfolio: String,
}

impl Holding {
    /// Unrealised gain on this position
    pub fn gain(&self) -> f64 {
        self.current_value - self.purchase_price
    }

    /// Gain relative to the purchase price, in percent
    pub fn gain_percent(&self) -> f64 {
        if self.purchase_price == 0.0 {
            0.0
        } else {
            self.gain() / self.purchase_price * 100.0
        }
    }

    /// Sum of coupons already paid
    pub fn paid_coupons_total(&self) -> f64 {
        self.coupons
            .iter()
            .filter(|c| c.status == CouponStatus::Paid)
            .map(|c| c.amount)
            .sum()
    }
}

/// Aggregate figures shown above the holdings table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    /// Sum of current values
    pub total_value: f64,
    /// Sum of purchase prices
    pub total_invested: f64,
    /// `total_value - total_invested`
    pub total_gain: f64,
}

impl PortfolioSummary {
    /// Aggregate a set of holdings
    pub fn from_holdings(holdings: &[Holding]) -> Self {
        let total_value: f64 = holdings.iter().map(|h| h.current_value).sum();
        let total_invested: f64 = holdings.iter().map(|h| h.purchase_price).sum();
        Self {
            total_value,
            total_invested,
            total_gain: total_value - total_invested,
        }
    }

    /// Zero counts as positive
    pub fn is_gain_positive(&self) -> bool {
        self.total_gain >= 0.0
    }
}

/// Filters applied to the holdings table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HoldingFilter {
    /// Free text over name, ISIN and issuer
    #[serde(default)]
    pub search: Option<String>,
    /// Detailed status label
    #[serde(default)]
    pub status: Option<String>,
    /// Sub-portfolio name
    #[serde(default)]
    pub sub_portfolio: Option<String>,
}

impl HoldingFilter {
    /// Whether a holding passes every active filter
    pub fn matches(&self, holding: &Holding) -> bool {
        let search_ok = match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                [&holding.product.name, &holding.product.isin, &holding.product.issuer]
                    .iter()
                    .any(|f| f.to_lowercase().contains(&needle))
            }
            _ => true,
        };
        let status_ok = match self.status.as_deref().filter(|s| !s.is_empty()) {
            Some(label) => label
                .parse::<HoldingStatus>()
                .map(|st| st == holding.detailed_status)
                .unwrap_or(false),
            None => true,
        };
        let bucket_ok = match self.sub_portfolio.as_deref().filter(|s| !s.is_empty()) {
            Some(bucket) => holding.sub_portfolio.eq_ignore_ascii_case(bucket),
            None => true,
        };
        search_ok && status_ok && bucket_ok
    }

    /// Apply to a slice, keeping order
    pub fn apply<'a>(&self, holdings: &'a [Holding]) -> Vec<&'a Holding> {
        holdings.iter().filter(|h| self.matches(h)).collect()
    }
}

/// Find a holding by product ISIN (case-insensitive).
pub fn find_by_isin<'a>(holdings: &'a [Holding], isin: &str) -> Option<&'a Holding> {
    holdings
        .iter()
        .find(|h| h.product.isin.eq_ignore_ascii_case(isin))
}

/// Distinct sub-portfolio names in first-seen order.
pub fn sub_portfolios(holdings: &[Holding]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for h in holdings {
        if !seen.contains(&h.sub_portfolio.as_str()) {
            seen.push(&h.sub_portfolio);
        }
    }
    seen
}

/// Category of a client-space document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum DocumentCategory {
    Contrats,
    Rapports,
    Notifications,
    Documentation,
    #[serde(rename = "Relevés")]
    Releves,
    Juridique,
    #[serde(rename = "Fiscalité")]
    Fiscalite,
}

impl DocumentCategory {
    /// Every category, in filter-bar order
    pub const ALL: [DocumentCategory; 7] = [
        DocumentCategory::Contrats,
        DocumentCategory::Rapports,
        DocumentCategory::Notifications,
        DocumentCategory::Documentation,
        DocumentCategory::Releves,
        DocumentCategory::Juridique,
        DocumentCategory::Fiscalite,
    ];

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            DocumentCategory::Contrats => "Contrats",
            DocumentCategory::Rapports => "Rapports",
            DocumentCategory::Notifications => "Notifications",
            DocumentCategory::Documentation => "Documentation",
            DocumentCategory::Releves => "Relevés",
            DocumentCategory::Juridique => "Juridique",
            DocumentCategory::Fiscalite => "Fiscalité",
        }
    }
}

impl FromStr for DocumentCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentCategory::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::unknown_value("category", s))
    }
}

/// Document in the client document space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct ClientDocument {
    pub id: String,
    pub name: String,
    pub file_type: String,
    pub category: DocumentCategory,
    pub date: String,
    pub size: String,
    pub url: String,
    #[serde(default)]
    pub product_name: Option<String>,
    pub description: String,
}

/// Search and category filter for the document space.
///
/// A missing category or `Tous` selects everything.
pub fn filter_documents<'a>(
    documents: &'a [ClientDocument],
    search: Option<&str>,
    category: Option<&str>,
) -> Vec<&'a ClientDocument> {
    let needle = search.map(|s| s.trim().to_lowercase()).unwrap_or_default();
    let category = category
        .filter(|c| !c.is_empty() && *c != "Tous")
        .map(|c| c.parse::<DocumentCategory>());

    documents
        .iter()
        .filter(|doc| {
            needle.is_empty()
                || doc.name.to_lowercase().contains(&needle)
                || doc.description.to_lowercase().contains(&needle)
                || doc
                    .product_name
                    .as_deref()
                    .map(|p| p.to_lowercase().contains(&needle))
                    .unwrap_or(false)
        })
        .filter(|doc| match &category {
            None => true,
            Some(Ok(c)) => doc.category == *c,
            Some(Err(_)) => false,
        })
        .collect()
}

/// Alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum AlertKind {
    Info,
    Warning,
    Success,
    Error,
}

/// Notification shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct Alert {
    pub id: String,
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    pub date: String,
    pub is_read: bool,
}

/// Number of unread alerts.
pub fn unread_count(alerts: &[Alert]) -> usize {
    alerts.iter().filter(|a| !a.is_read).count()
}
