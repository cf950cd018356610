//! Product list query parameters.

use serde::{Deserialize, Serialize};

/// Page size used when the caller gives none.
pub const DEFAULT_LIMIT: u32 = 50;

/// Filters for the product list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct ProductQuery {
    #[serde(default)]
    pub isin: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

impl ProductQuery {
    /// Query-string pairs in a stable order; empty filters are dropped and
    /// `limit` is always present.
    ///
    /// # Examples
    /// ```
    /// use adapter_backend::ProductQuery;
    ///
    /// let q = ProductQuery { search: Some("cac".into()), ..Default::default() };
    /// assert_eq!(
    ///     q.to_pairs(),
    ///     vec![("search", "cac".to_string()), ("limit", "50".to_string())]
    /// );
    /// ```
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let filters = [
            ("isin", &self.isin),
            ("search", &self.search),
            ("category", &self.category),
            ("family", &self.family),
            ("status", &self.status),
        ];
        for (key, value) in filters {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                pairs.push((key, v.to_string()));
            }
        }
        pairs.push(("limit", self.limit.unwrap_or(DEFAULT_LIMIT).to_string()));
        if let Some(offset) = self.offset.filter(|o| *o > 0) {
            pairs.push(("offset", offset.to_string()));
        }
        pairs
    }
}
