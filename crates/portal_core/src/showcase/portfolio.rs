//! Demo client space: holdings, documents, alerts and statistics.

use serde::Serialize;

use crate::portfolio::{
    Alert, AlertKind, ClientDocument, Coupon, CouponStatus, DocumentCategory, DocumentKind,
    Holding, HoldingStatus, PerformancePoint, ProductDocument,
};
use crate::product::Product;
use crate::stats::{AllocationSlice, RiskMetric, SeriesPoint, Trend};

use super::marketing::sample_products;

/// Dedicated advisor of the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct Advisor {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub photo: String,
}

/// Contact card of the demo client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct ClientProfile {
    pub name: String,
    pub email: String,
    pub photo: String,
    pub advisor: Advisor,
}

/// The demo client and their advisor.
pub fn current_client() -> ClientProfile {
    ClientProfile {
        name: "Jean Dupont".to_string(),
        email: "jean.dupont@email.com".to_string(),
        photo: "/static/user-avatar.jpg".to_string(),
        advisor: Advisor {
            name: "Marie Martin".to_string(),
            email: "marie.martin@structura.fr".to_string(),
            phone: "+33 1 23 45 67 89".to_string(),
            photo: "/static/advisor-photo.jpg".to_string(),
        },
    }
}

fn documents(slug: &str, kinds: &[(DocumentKind, &str)]) -> Vec<ProductDocument> {
    kinds
        .iter()
        .map(|(kind, size)| {
            let suffix = match kind {
                DocumentKind::TermSheet => "termsheet",
                DocumentKind::RemunerationLetter => "remuneration",
                DocumentKind::CommercialBrochure => "brochure",
            };
            ProductDocument {
                name: kind.label().to_string(),
                kind: *kind,
                url: format!("/static/documents/{slug}_{suffix}.pdf"),
                size: size.to_string(),
            }
        })
        .collect()
}

fn history(points: &[(&str, f64)]) -> Vec<PerformancePoint> {
    points
        .iter()
        .map(|(date, value)| PerformancePoint {
            date: date.to_string(),
            value: *value,
        })
        .collect()
}

fn coupons(rate: &str, amount: f64, lines: &[(&str, CouponStatus)]) -> Vec<Coupon> {
    lines
        .iter()
        .map(|(date, status)| Coupon {
            date: date.to_string(),
            rate: rate.to_string(),
            amount,
            status: *status,
        })
        .collect()
}

fn product_at(products: &[Product], index: usize) -> Product {
    products[index].clone()
}

/// Holdings of the demo client.
pub fn holdings() -> Vec<Holding> {
    use CouponStatus::{Paid, Scheduled};
    use DocumentKind::{CommercialBrochure, RemunerationLetter, TermSheet};

    let products = sample_products();
    vec![
        Holding {
            product: product_at(&products, 0),
            quantity: 10,
            purchase_date: "2024-02-15".to_string(),
            purchase_price: 1000.0,
            current_value: 1085.0,
            expiry_date: "2027-02-15".to_string(),
            detailed_status: HoldingStatus::Running,
            documents: documents(
                "product1",
                &[(TermSheet, "2.3 MB"), (RemunerationLetter, "1.1 MB"), (CommercialBrochure, "4.2 MB")],
            ),
            performance_history: history(&[
                ("2024-02-15", 1000.0),
                ("2024-03-15", 1020.0),
                ("2024-04-15", 995.0),
                ("2024-05-15", 1045.0),
                ("2024-06-15", 1030.0),
                ("2024-07-15", 1065.0),
                ("2024-08-15", 1050.0),
                ("2024-09-15", 1075.0),
                ("2024-10-15", 1090.0),
                ("2024-11-15", 1080.0),
                ("2024-12-15", 1085.0),
            ]),
            coupons: coupons(
                "8.5%",
                85.0,
                &[("2024-08-15", Paid), ("2025-02-15", Scheduled), ("2025-08-15", Scheduled)],
            ),
            period: "3 ans".to_string(),
            sub_portfolio: "Croissance".to_string(),
        },
        Holding {
            product: product_at(&products, 3),
            quantity: 5,
            purchase_date: "2024-01-20".to_string(),
            purchase_price: 500.0,
            current_value: 547.5,
            expiry_date: "2026-01-20".to_string(),
            detailed_status: HoldingStatus::Called,
            documents: documents(
                "product4",
                &[(TermSheet, "1.8 MB"), (RemunerationLetter, "0.9 MB"), (CommercialBrochure, "3.1 MB")],
            ),
            performance_history: history(&[
                ("2024-01-20", 500.0),
                ("2024-02-20", 515.0),
                ("2024-03-20", 525.0),
                ("2024-04-20", 535.0),
                ("2024-05-20", 540.0),
                ("2024-06-20", 545.0),
                ("2024-07-20", 550.0),
                ("2024-08-20", 547.5),
            ]),
            coupons: coupons("9.5%", 47.5, &[("2024-07-20", Paid), ("2025-01-20", Scheduled)]),
            period: "2 ans".to_string(),
            sub_portfolio: "Protection".to_string(),
        },
        Holding {
            product: product_at(&products, 1),
            quantity: 15,
            purchase_date: "2023-11-10".to_string(),
            purchase_price: 1500.0,
            current_value: 1620.0,
            expiry_date: "2025-11-10".to_string(),
            detailed_status: HoldingStatus::AtMaturity,
            documents: documents("product2", &[(TermSheet, "2.1 MB"), (RemunerationLetter, "1.3 MB")]),
            performance_history: history(&[
                ("2023-11-10", 1500.0),
                ("2023-12-10", 1520.0),
                ("2024-01-10", 1535.0),
                ("2024-02-10", 1550.0),
                ("2024-03-10", 1565.0),
                ("2024-04-10", 1580.0),
                ("2024-05-10", 1595.0),
                ("2024-06-10", 1610.0),
                ("2024-07-10", 1620.0),
            ]),
            coupons: coupons(
                "6.2%",
                93.0,
                &[("2024-05-10", Paid), ("2024-11-10", Paid), ("2025-05-10", Scheduled)],
            ),
            period: "2 ans".to_string(),
            sub_portfolio: "Rendement".to_string(),
        },
        Holding {
            product: product_at(&products, 2),
            quantity: 8,
            purchase_date: "2023-06-01".to_string(),
            purchase_price: 800.0,
            current_value: 850.0,
            expiry_date: "2025-06-01".to_string(),
            detailed_status: HoldingStatus::Running,
            documents: documents("product3", &[(TermSheet, "1.9 MB"), (CommercialBrochure, "2.8 MB")]),
            performance_history: history(&[
                ("2023-06-01", 800.0),
                ("2023-07-01", 810.0),
                ("2023-08-01", 820.0),
                ("2023-09-01", 815.0),
                ("2023-10-01", 825.0),
                ("2023-11-01", 830.0),
                ("2023-12-01", 835.0),
                ("2024-01-01", 840.0),
                ("2024-02-01", 845.0),
                ("2024-03-01", 850.0),
            ]),
            coupons: coupons(
                "4.8%",
                38.4,
                &[("2024-06-01", Paid), ("2024-12-01", Paid), ("2025-06-01", Scheduled)],
            ),
            period: "2 ans".to_string(),
            sub_portfolio: "Croissance".to_string(),
        },
        Holding {
            product: product_at(&products, 4),
            quantity: 12,
            purchase_date: "2022-12-15".to_string(),
            purchase_price: 1200.0,
            current_value: 1200.0,
            expiry_date: "2024-12-15".to_string(),
            detailed_status: HoldingStatus::Redeemed,
            documents: documents(
                "product5",
                &[(TermSheet, "2.0 MB"), (RemunerationLetter, "1.2 MB"), (CommercialBrochure, "3.5 MB")],
            ),
            performance_history: (0..14)
                .map(|m| PerformancePoint {
                    date: format!("{}-{:02}-15", 2022 + (11 + m) / 12, (11 + m) % 12 + 1),
                    value: 1200.0,
                })
                .collect(),
            coupons: coupons(
                "12.5%",
                150.0,
                &[
                    ("2023-06-15", Paid),
                    ("2023-12-15", Paid),
                    ("2024-06-15", Paid),
                    ("2024-12-15", Paid),
                ],
            ),
            period: "2 ans".to_string(),
            sub_portfolio: "Protection".to_string(),
        },
    ]
}

/// Products the demo client follows without holding them.
pub fn wishlist() -> Vec<Product> {
    let products = sample_products();
    [1, 2, 4].into_iter().map(|i| product_at(&products, i)).collect()
}

/// Dashboard notifications.
pub fn alerts() -> Vec<Alert> {
    let holdings = holdings();
    vec![
        Alert {
            id: "1".to_string(),
            kind: AlertKind::Warning,
            title: "Produit arrivant à échéance".to_string(),
            message: format!(
                "Votre produit \"{}\" arrive à échéance le 15 Mars 2025",
                holdings[0].product.name
            ),
            date: "2025-01-15".to_string(),
            is_read: false,
        },
        Alert {
            id: "2".to_string(),
            kind: AlertKind::Info,
            title: "Nouveau coupon versé".to_string(),
            message: format!(
                "Un coupon de 9.5% a été versé sur votre produit \"{}\"",
                holdings[1].product.name
            ),
            date: "2025-01-10".to_string(),
            is_read: false,
        },
        Alert {
            id: "3".to_string(),
            kind: AlertKind::Success,
            title: "Produit remboursé".to_string(),
            message: format!(
                "Votre produit \"{}\" a été remboursé avec succès",
                holdings[4].product.name
            ),
            date: "2025-01-05".to_string(),
            is_read: true,
        },
    ]
}

/// Documents of the client space.
pub fn client_documents() -> Vec<ClientDocument> {
    use DocumentCategory::*;

    [
        ("1", "Contrat de Souscription - Autocall BNP Paribas", Contrats, "15 Nov 2024", "2.3 MB", Some("Autocall BNP Paribas"), "Contrat de souscription initial"),
        ("2", "Relevé de Performance Q4 2024", Rapports, "10 Nov 2024", "1.8 MB", None, "Performance trimestrielle détaillée"),
        ("3", "Avis d'Opération - Phoenix Société Générale", Notifications, "05 Nov 2024", "0.8 MB", Some("Phoenix Société Générale"), "Remboursement anticipé"),
        ("4", "Prospectus - Athena Crédit Agricole", Documentation, "28 Oct 2024", "4.1 MB", Some("Athena Crédit Agricole"), "Documentation produit complète"),
        ("5", "Relevé Mensuel Octobre 2024", Releves, "01 Nov 2024", "1.2 MB", None, "Relevé mensuel de portefeuille"),
        ("6", "Conditions Générales", Juridique, "15 Jan 2024", "3.5 MB", None, "Conditions générales mises à jour"),
        ("7", "Certificat Fiscal 2024", Fiscalite, "31 Dec 2023", "0.9 MB", None, "Certificat pour déclaration fiscale"),
        ("8", "Notice d'Information - Digital Barrier", Documentation, "20 Sep 2024", "2.1 MB", Some("Digital Barrier Note"), "Notice explicative détaillée"),
    ]
    .into_iter()
    .map(|(id, name, category, date, size, product, description)| ClientDocument {
        id: id.to_string(),
        name: name.to_string(),
        file_type: "PDF".to_string(),
        category,
        date: date.to_string(),
        size: size.to_string(),
        url: format!("/static/documents/client_{id}.pdf"),
        product_name: product.map(str::to_string),
        description: description.to_string(),
    })
    .collect()
}

/// Monthly performance of the current year, in percent.
pub fn monthly_performance() -> Vec<SeriesPoint> {
    [
        ("Jan", 2.1),
        ("Fév", 3.2),
        ("Mar", 1.8),
        ("Avr", 4.1),
        ("Mai", 2.9),
        ("Jun", 3.7),
        ("Jul", 5.2),
        ("Aoû", 4.8),
        ("Sep", 3.1),
        ("Oct", 4.3),
        ("Nov", 5.7),
        ("Déc", 6.2),
    ]
    .into_iter()
    .map(|(label, value)| SeriesPoint::new(label, value))
    .collect()
}

/// Yearly cumulative performance, in percent.
pub fn yearly_comparison() -> Vec<SeriesPoint> {
    vec![
        SeriesPoint::new("2022", 12.4),
        SeriesPoint::new("2023", 18.7),
        SeriesPoint::new("2024", 24.1),
    ]
}

/// Asset allocation of the demo client.
pub fn asset_allocation() -> Vec<AllocationSlice> {
    [
        ("Produits Structurés", 65.0, 32500.0, "#3B82F6"),
        ("Actions", 20.0, 10000.0, "#10B981"),
        ("Obligations", 10.0, 5000.0, "#F59E0B"),
        ("Liquidités", 5.0, 2500.0, "#EF4444"),
    ]
    .into_iter()
    .map(|(name, percentage, value, color)| AllocationSlice {
        name: name.to_string(),
        percentage,
        value,
        color: color.to_string(),
    })
    .collect()
}

/// Risk indicators of the demo client.
pub fn risk_metrics() -> Vec<RiskMetric> {
    [
        ("Volatilité", "12.4%", Trend::Down, "12 mois"),
        ("Sharpe Ratio", "1.24", Trend::Up, "Sur 3 ans"),
        ("Beta", "0.87", Trend::Neutral, "Vs marché"),
        ("VaR (95%)", "€1,247", Trend::Down, "1 mois"),
    ]
    .into_iter()
    .map(|(label, value, trend, description)| RiskMetric {
        label: label.to_string(),
        value: value.to_string(),
        trend,
        description: description.to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::{find_by_isin, unread_count, PortfolioSummary};

    #[test]
    fn test_demo_portfolio_totals() {
        let summary = PortfolioSummary::from_holdings(&holdings());
        assert_eq!(summary.total_invested, 5000.0);
        assert_eq!(summary.total_value, 5302.5);
        assert!(summary.is_gain_positive());
    }

    #[test]
    fn test_redeemed_holding_history_spans_fourteen_months() {
        let h = holdings();
        let redeemed = find_by_isin(&h, "FR0012345682").unwrap();
        assert_eq!(redeemed.performance_history.len(), 14);
        assert_eq!(redeemed.performance_history[0].date, "2022-12-15");
        assert_eq!(redeemed.performance_history[13].date, "2024-01-15");
        assert_eq!(redeemed.paid_coupons_total(), 600.0);
    }

    #[test]
    fn test_allocation_sums_to_hundred() {
        let total: f64 = asset_allocation().iter().map(|s| s.percentage).sum();
        assert_eq!(total, 100.0);
    }

    #[test]
    fn test_alerts_reference_held_products() {
        let alerts = alerts();
        assert_eq!(unread_count(&alerts), 2);
        assert!(alerts[0].message.contains("Autocall CAC 40"));
    }

    #[test]
    fn test_documents_have_unique_ids() {
        let docs = client_documents();
        let mut ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        ids.dedup();
        assert_eq!(ids.len(), 8);
        assert_eq!(current_client().advisor.name, "Marie Martin");
        assert_eq!(wishlist().len(), 3);
    }

    #[test]
    fn test_series_lengths() {
        assert_eq!(monthly_performance().len(), 12);
        assert_eq!(yearly_comparison().len(), 3);
        assert_eq!(risk_metrics().len(), 4);
    }
}
