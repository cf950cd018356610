//! Holdings list and holding detail.

use std::fmt;

use portal_core::portfolio::{
    sub_portfolios, Holding, HoldingFilter, HoldingStatus, PortfolioSummary,
};
use portal_core::stats::SeriesPoint;

use crate::views::components::AreaChart;
use crate::views::{encode_query, format_eur, format_signed_percent, Escaped};

fn gain_class(positive: bool) -> &'static str {
    if positive {
        "gain"
    } else {
        "loss"
    }
}

/// Totals band shared with the dashboard.
pub(crate) fn summary_cards(f: &mut fmt::Formatter<'_>, summary: &PortfolioSummary) -> fmt::Result {
    let percent = if summary.total_invested == 0.0 {
        0.0
    } else {
        summary.total_gain / summary.total_invested * 100.0
    };
    write!(
        f,
        r#"<div class="summary-cards"><div class="summary-card"><p>Valeur Totale</p><strong>{}</strong></div><div class="summary-card"><p>Investissement Initial</p><strong>{}</strong></div><div class="summary-card {}"><p>Plus/Moins Value</p><strong>{}</strong><span>{}</span></div></div>"#,
        format_eur(summary.total_value),
        format_eur(summary.total_invested),
        gain_class(summary.is_gain_positive()),
        format_eur(summary.total_gain),
        format_signed_percent(percent)
    )
}

/// Link to the holding detail page
pub fn holding_href(isin: &str) -> String {
    format!("/portfolio/{}", encode_query(isin))
}

pub struct PortfolioPage<'a> {
    pub filter: &'a HoldingFilter,
    /// Every holding, used for the totals and the sub-portfolio list
    pub holdings: &'a [Holding],
}

impl PortfolioPage<'_> {
    fn filters(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current_status = self.filter.status.as_deref().unwrap_or_default();
        let current_bucket = self.filter.sub_portfolio.as_deref().unwrap_or_default();
        write!(
            f,
            r#"<form class="holding-filters" method="get" action="/portfolio"><input type="search" name="search" placeholder="Rechercher par nom, ISIN ou émetteur" value="{}"><select name="status"><option value="">Tous les statuts</option>"#,
            Escaped(self.filter.search.as_deref().unwrap_or_default())
        )?;
        for status in HoldingStatus::ALL {
            let selected = if status.label() == current_status { " selected" } else { "" };
            write!(f, r#"<option value="{0}"{selected}>{0}</option>"#, status.label())?;
        }
        f.write_str(r#"</select><select name="sub_portfolio"><option value="">Tous les portefeuilles</option>"#)?;
        for bucket in sub_portfolios(self.holdings) {
            let selected = if bucket.eq_ignore_ascii_case(current_bucket) { " selected" } else { "" };
            write!(f, r#"<option value="{0}"{selected}>{0}</option>"#, Escaped(bucket))?;
        }
        f.write_str(r#"</select><button type="submit" class="button">Filtrer</button></form>"#)
    }
}

impl fmt::Display for PortfolioPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(r#"<h1 class="page-title">Mon Portefeuille</h1>"#)?;
        summary_cards(f, &PortfolioSummary::from_holdings(self.holdings))?;
        self.filters(f)?;

        let visible = self.filter.apply(self.holdings);
        if visible.is_empty() {
            return f.write_str(r#"<p class="empty">Aucun produit ne correspond à vos critères.</p>"#);
        }
        f.write_str(
            r#"<table class="holdings"><thead><tr><th>Produit</th><th>Portefeuille</th><th>Quantité</th><th>Investi</th><th>Valeur actuelle</th><th>Performance</th><th>Statut</th></tr></thead><tbody>"#,
        )?;
        for h in visible {
            write!(
                f,
                r#"<tr><td><a href="{href}">{name}</a><br><small>{isin} · {issuer}</small></td><td>{bucket}</td><td>{qty}</td><td>{paid}</td><td>{value}</td><td class="{class}">{perf}</td><td><span class="holding-status {status_class}">{status}</span></td></tr>"#,
                href = holding_href(&h.product.isin),
                name = Escaped(&h.product.name),
                isin = Escaped(&h.product.isin),
                issuer = Escaped(&h.product.issuer),
                bucket = Escaped(&h.sub_portfolio),
                qty = h.quantity,
                paid = format_eur(h.purchase_price),
                value = format_eur(h.current_value),
                class = gain_class(h.gain() >= 0.0),
                perf = format_signed_percent(h.gain_percent()),
                status_class = h.detailed_status.css_class(),
                status = h.detailed_status.label(),
            )?;
        }
        f.write_str("</tbody></table>\n")
    }
}

pub struct HoldingDetailPage<'a> {
    pub holding: &'a Holding,
}

impl fmt::Display for HoldingDetailPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.holding;
        let p = &h.product;
        write!(
            f,
            r#"<a class="back-link" href="/portfolio">← Retour au portefeuille</a>
<div class="holding-head"><div><h1>{name}</h1><p>{isin} · {issuer} · {underlying}</p></div><span class="holding-status {status_class}">{status}</span></div>
<div class="summary-cards"><div class="summary-card"><p>Valeur actuelle</p><strong>{value}</strong></div><div class="summary-card"><p>Investissement</p><strong>{paid}</strong></div><div class="summary-card {class}"><p>Performance</p><strong>{gain}</strong><span>{perf}</span></div><div class="summary-card"><p>Coupons versés</p><strong>{coupons}</strong></div></div>
<dl class="holding-facts"><div><dt>Quantité</dt><dd>{qty}</dd></div><div><dt>Date d'achat</dt><dd>{bought}</dd></div><div><dt>Échéance</dt><dd>{expiry}</dd></div><div><dt>Période</dt><dd>{period}</dd></div><div><dt>Portefeuille</dt><dd>{bucket}</dd></div></dl>
"#,
            name = Escaped(&p.name),
            isin = Escaped(&p.isin),
            issuer = Escaped(&p.issuer),
            underlying = Escaped(&p.underlying),
            status_class = h.detailed_status.css_class(),
            status = h.detailed_status.label(),
            value = format_eur(h.current_value),
            paid = format_eur(h.purchase_price),
            class = gain_class(h.gain() >= 0.0),
            gain = format_eur(h.gain()),
            perf = format_signed_percent(h.gain_percent()),
            coupons = format_eur(h.paid_coupons_total()),
            qty = h.quantity,
            bought = Escaped(&h.purchase_date),
            expiry = Escaped(&h.expiry_date),
            period = Escaped(&h.period),
            bucket = Escaped(&h.sub_portfolio),
        )?;

        let series: Vec<SeriesPoint> = h
            .performance_history
            .iter()
            .map(|point| SeriesPoint::new(point.date.clone(), point.value))
            .collect();
        write!(
            f,
            r#"<section class="panel"><h2>Évolution de la valeur</h2>{}</section>"#,
            AreaChart {
                points: &series,
                prefix: "€",
            }
        )?;

        f.write_str(r#"<section class="panel"><h2>Coupons</h2>"#)?;
        if h.coupons.is_empty() {
            f.write_str(r#"<p class="empty">Aucun coupon pour ce produit.</p>"#)?;
        } else {
            f.write_str(r#"<table class="coupons"><thead><tr><th>Date</th><th>Taux</th><th>Montant</th><th>Statut</th></tr></thead><tbody>"#)?;
            for coupon in &h.coupons {
                write!(
                    f,
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    Escaped(&coupon.date),
                    Escaped(&coupon.rate),
                    format_eur(coupon.amount),
                    coupon.status.label()
                )?;
            }
            f.write_str("</tbody></table>")?;
        }
        f.write_str("</section>")?;

        f.write_str(r#"<section class="panel"><h2>Documents</h2><ul class="document-list">"#)?;
        for doc in &h.documents {
            write!(
                f,
                r#"<li><span class="doc-name">{}</span><span class="doc-size">{}</span><a class="button-outline" href="{}" download>Télécharger</a></li>"#,
                Escaped(&doc.name),
                Escaped(&doc.size),
                Escaped(&doc.url)
            )?;
        }
        f.write_str("</ul></section>\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::showcase::holdings;

    #[test]
    fn test_portfolio_lists_all_by_default() {
        let all = holdings();
        let filter = HoldingFilter::default();
        let html = PortfolioPage {
            filter: &filter,
            holdings: &all,
        }
        .to_string();
        assert_eq!(html.matches("<tr><td><a href=\"/portfolio/").count(), all.len());
        assert!(html.contains(&format_eur(5302.5)));
    }

    #[test]
    fn test_portfolio_filter_by_status() {
        let all = holdings();
        let filter = HoldingFilter {
            status: Some("Remboursé".into()),
            ..Default::default()
        };
        let expected = filter.apply(&all).len();
        let html = PortfolioPage {
            filter: &filter,
            holdings: &all,
        }
        .to_string();
        assert_eq!(html.matches("<tr><td><a href=\"/portfolio/").count(), expected);
        assert!(html.contains(r#"<option value="Remboursé" selected>"#));
    }

    #[test]
    fn test_portfolio_no_match() {
        let all = holdings();
        let filter = HoldingFilter {
            search: Some("zzz-nothing".into()),
            ..Default::default()
        };
        let html = PortfolioPage {
            filter: &filter,
            holdings: &all,
        }
        .to_string();
        assert!(html.contains("Aucun produit ne correspond"));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn test_holding_detail() {
        let all = holdings();
        let html = HoldingDetailPage { holding: &all[0] }.to_string();
        assert!(html.contains("area-chart"));
        assert!(html.contains("Télécharger"));
        assert!(html.contains("Versé"));
        assert!(html.contains(&format_eur(85.0)));
    }
}
