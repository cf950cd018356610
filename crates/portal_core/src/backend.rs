//! Record shapes returned by the product data service and the mapping onto
//! portal [`Product`] values.
//!
//! The data service speaks snake_case with its own table vocabulary
//! (`deliver` for the issuer, `sousjacents` for underlyings). Everything that
//! leaves the portal is renamed here, in one place.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::product::{
    format_barrier, format_launch_date, format_rate, Analysis, Characteristics, Family, Product,
    ProductStatus,
};

/// Fallback for missing issuer or underlying names.
pub const UNKNOWN: &str = "Unknown";

/// Currency shown until the data service exposes one per product.
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Product row (`prd_product`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct BackendProduct {
    pub id: i64,
    pub label: String,
    pub isin: String,
    #[serde(default)]
    pub deliver: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub launch_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub coupon: Option<f64>,
    #[serde(default)]
    pub coupon_year: Option<f64>,
    #[serde(default)]
    pub capital_protection: Option<f64>,
    #[serde(default)]
    pub protection_barrier: Option<f64>,
    #[serde(default)]
    pub coupon_barrier: Option<f64>,
    #[serde(default)]
    pub reimbursement_barrier: Option<f64>,
    #[serde(default)]
    pub id_prd_status: Option<i64>,
    #[serde(default)]
    pub capital_guaranteed: Option<bool>,
    #[serde(default)]
    pub performance: Option<f64>,
}

/// Status row (`prd_status`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct BackendStatus {
    pub id: i64,
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Issuer row (`deliver_table`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct BackendIssuer {
    pub id: i64,
    pub deliver: String,
    #[serde(default)]
    pub groups: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
}

/// Underlying row (`prd_sousjacent`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct BackendUnderlying {
    pub id: i64,
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Detail payload: the product and its joined rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendProductDetail {
    /// Product row
    pub product: BackendProduct,
    /// Joined status row
    #[serde(default)]
    pub status: Option<BackendStatus>,
    /// Joined issuer row
    #[serde(default)]
    pub deliver: Option<BackendIssuer>,
    /// Joined underlyings
    #[serde(default)]
    pub sousjacents: Option<Vec<BackendUnderlying>>,
}

/// Paginated list envelope.
///
/// `next` and `previous` are forwarded untouched: depending on the backend
/// view they are URLs, booleans or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendPage<T> {
    /// Total number of rows matching the query
    #[serde(default)]
    pub count: Option<u64>,
    /// Next page marker
    #[serde(default)]
    pub next: Value,
    /// Previous page marker
    #[serde(default)]
    pub previous: Value,
    /// Rows of this page
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// Mapped list envelope served by `/api/products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    /// Mapped products
    pub products: Vec<Product>,
    /// Total count (falls back to the page length)
    pub count: u64,
    /// Next page marker
    pub next: Value,
    /// Previous page marker
    pub previous: Value,
}

impl ProductPage {
    /// Map every row of a backend page
    pub fn from_backend(page: BackendPage<BackendProduct>) -> Self {
        let products: Vec<Product> = page.results.iter().map(|p| map_summary(p, None)).collect();
        Self {
            count: page.count.unwrap_or(products.len() as u64),
            products,
            next: page.next,
            previous: page.previous,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// Map a list row onto a card-level [`Product`].
pub fn map_summary(product: &BackendProduct, status: Option<&BackendStatus>) -> Product {
    Product {
        name: product.label.clone(),
        start_date: format_launch_date(product.launch_date.as_deref()),
        isin: product.isin.clone(),
        issuer: non_empty(product.deliver.as_deref())
            .unwrap_or(UNKNOWN)
            .to_string(),
        underlying: non_empty(product.category.as_deref())
            .unwrap_or(UNKNOWN)
            .to_string(),
        status: status
            .map(|s| ProductStatus::from_code(&s.code))
            .unwrap_or_default(),
        family: Family::from_backend(product.family.as_deref().unwrap_or_default()),
        summary: None,
        characteristics: None,
        analysis: None,
    }
}

/// Map a detail payload onto a fully populated [`Product`].
pub fn map_detailed(detail: &BackendProductDetail) -> Product {
    let row = &detail.product;
    let family_label = row.family.clone().unwrap_or_default();

    let issuer = detail
        .deliver
        .as_ref()
        .and_then(|d| non_empty(Some(d.deliver.as_str())))
        .or_else(|| non_empty(row.deliver.as_deref()))
        .unwrap_or(UNKNOWN)
        .to_string();

    let underlying = match detail.sousjacents.as_deref() {
        Some(list) if !list.is_empty() => list
            .iter()
            .map(|u| u.label.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        _ => non_empty(row.category.as_deref())
            .unwrap_or(UNKNOWN)
            .to_string(),
    };

    let coupon_year = format_rate(row.coupon_year);
    let summary = format!(
        "Produit structuré {} avec coupon de {} annuel.",
        family_label.to_lowercase(),
        coupon_year
    );

    let characteristics = Characteristics {
        emetteur: issuer.clone(),
        devise: DEFAULT_CURRENCY.to_string(),
        categorie: family_label.clone(),
        sous_jacents: underlying.clone(),
        barriere_coupon: format_barrier(row.coupon_barrier),
        observations: if row.capital_guaranteed.unwrap_or(false) {
            "Capital garanti".to_string()
        } else {
            "Capital non garanti".to_string()
        },
        coupon: coupon_year.clone(),
        niveau_initial: "100%".to_string(),
        barriere_rappel: format_barrier(row.reimbursement_barrier),
        barriere_protection: format_barrier(row.protection_barrier),
    };

    Product {
        name: row.label.clone(),
        start_date: format_launch_date(row.launch_date.as_deref()),
        isin: row.isin.clone(),
        issuer,
        underlying,
        status: detail
            .status
            .as_ref()
            .map(|s| ProductStatus::from_code(&s.code))
            .unwrap_or_default(),
        family: Family::from_backend(&family_label),
        summary: Some(summary),
        characteristics: Some(characteristics),
        analysis: Some(pending_analysis()),
    }
}

fn pending_analysis() -> Analysis {
    let pending = |topic: &str| {
        Some(format!(
            "{} en cours de développement avec les données réelles du produit.",
            topic
        ))
    };
    Analysis {
        analyse_risque: pending("Analyse des risques"),
        analyse_technique: pending("Analyse technique"),
        analyse_marche: pending("Analyse de marché"),
        analyse_performance: pending("Analyse de performance"),
        recommandation: pending("Recommandation"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detail_json() -> Value {
        json!({
            "product": {
                "id": 42,
                "label": "Phoenix Mémoire Stellantis",
                "isin": "FR0014001234",
                "deliver": "SG Issuer",
                "family": "Phoenix",
                "category": "Actions",
                "launch_date": "2024-03-18",
                "due_date": "2032-03-18",
                "coupon": 2.1,
                "coupon_year": 8.4,
                "capital_protection": 0.0,
                "protection_barrier": 0.6,
                "coupon_barrier": 0.7,
                "reimbursement_barrier": 1.0,
                "id_prd_status": 3,
                "capital_guaranteed": false,
                "performance": 4.2
            },
            "status": {"id": 3, "code": "LIVE", "description": "En vie"},
            "deliver": {"id": 9, "deliver": "Société Générale", "groups": "SG", "nationality": "FR"},
            "sousjacents": [
                {"id": 1, "label": "Stellantis", "type": "Action"},
                {"id": 2, "label": "Renault", "type": "Action"}
            ]
        })
    }

    #[test]
    fn test_map_summary_defaults() {
        let row = BackendProduct {
            id: 1,
            label: "Athena".to_string(),
            isin: "FR0012345678".to_string(),
            family: Some("CLN".to_string()),
            launch_date: Some("2025-02-03".to_string()),
            ..Default::default()
        };
        let product = map_summary(&row, None);
        assert_eq!(product.issuer, UNKNOWN);
        assert_eq!(product.underlying, UNKNOWN);
        assert_eq!(product.status, ProductStatus::NotStarted);
        assert_eq!(product.family, Family::Cln);
        assert_eq!(product.start_date, "Fév. 2025");
        assert!(product.summary.is_none());
    }

    #[test]
    fn test_map_summary_treats_blank_issuer_as_unknown() {
        let row = BackendProduct {
            deliver: Some("  ".to_string()),
            category: Some("Taux".to_string()),
            ..Default::default()
        };
        let product = map_summary(&row, None);
        assert_eq!(product.issuer, UNKNOWN);
        assert_eq!(product.underlying, "Taux");
    }

    #[test]
    fn test_map_detailed_full_payload() {
        let detail: BackendProductDetail = serde_json::from_value(detail_json()).unwrap();
        let product = map_detailed(&detail);

        assert_eq!(product.issuer, "Société Générale");
        assert_eq!(product.underlying, "Stellantis, Renault");
        assert_eq!(product.status, ProductStatus::Started);
        assert_eq!(product.family, Family::Phoenix);
        assert_eq!(
            product.summary.as_deref(),
            Some("Produit structuré phoenix avec coupon de 8.4% annuel.")
        );

        let c = product.characteristics.expect("characteristics");
        assert_eq!(c.emetteur, "Société Générale");
        assert_eq!(c.devise, "EUR");
        assert_eq!(c.categorie, "Phoenix");
        assert_eq!(c.barriere_coupon, "70%");
        assert_eq!(c.barriere_rappel, "100%");
        assert_eq!(c.barriere_protection, "60%");
        assert_eq!(c.coupon, "8.4%");
        assert_eq!(c.observations, "Capital non garanti");
        assert_eq!(c.niveau_initial, "100%");

        assert_eq!(product.analysis.unwrap().sections().len(), 5);
    }

    #[test]
    fn test_map_detailed_without_joins_falls_back_to_row() {
        let mut value = detail_json();
        value.as_object_mut().unwrap().remove("deliver");
        value.as_object_mut().unwrap().remove("status");
        value["sousjacents"] = json!([]);
        let detail: BackendProductDetail = serde_json::from_value(value).unwrap();

        let product = map_detailed(&detail);
        assert_eq!(product.issuer, "SG Issuer");
        assert_eq!(product.underlying, "Actions");
        assert_eq!(product.status, ProductStatus::NotStarted);
    }

    #[test]
    fn test_map_detailed_null_coupon_keeps_characteristics() {
        let mut value = detail_json();
        value["product"]["coupon"] = Value::Null;
        value["product"]["coupon_year"] = json!(7.0);
        let detail: BackendProductDetail = serde_json::from_value(value).unwrap();

        let product = map_detailed(&detail);
        let c = product.characteristics.expect("detail payload always has characteristics");
        assert_eq!(c.coupon, "7%");
        assert_eq!(product.analysis.unwrap().sections().len(), 5);
        assert!(product.summary.is_some());
    }

    #[test]
    fn test_guaranteed_capital_observation() {
        let mut value = detail_json();
        value["product"]["capital_guaranteed"] = json!(true);
        value["product"]["coupon_barrier"] = json!(0);
        let detail: BackendProductDetail = serde_json::from_value(value).unwrap();

        let c = map_detailed(&detail).characteristics.unwrap();
        assert_eq!(c.observations, "Capital garanti");
        assert_eq!(c.barriere_coupon, "N/A");
    }

    #[test]
    fn test_product_page_passes_links_through() {
        let page: BackendPage<BackendProduct> = serde_json::from_value(json!({
            "results": [
                {"id": 1, "label": "A", "isin": "FR0000000001", "family": "Autocall"},
                {"id": 2, "label": "B", "isin": "FR0000000002", "family": "Protection"}
            ],
            "next": true,
            "previous": null
        }))
        .unwrap();

        let mapped = ProductPage::from_backend(page);
        assert_eq!(mapped.count, 2);
        assert_eq!(mapped.next, json!(true));
        assert_eq!(mapped.previous, Value::Null);
        assert_eq!(mapped.products[1].family, Family::Protection);
    }

    #[test]
    fn test_product_page_keeps_backend_count() {
        let page: BackendPage<BackendProduct> = serde_json::from_value(json!({
            "count": 120,
            "next": "http://backend/api/products/?offset=50",
            "previous": null,
            "results": []
        }))
        .unwrap();

        let mapped = ProductPage::from_backend(page);
        assert_eq!(mapped.count, 120);
        assert!(mapped.products.is_empty());
    }
}
