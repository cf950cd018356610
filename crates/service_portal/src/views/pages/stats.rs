//! Performance statistics.

use std::fmt;

use portal_core::portfolio::Holding;
use portal_core::stats::{AllocationSlice, RiskMetric, SeriesPoint};

use crate::views::components::{BarChart, DonutChart, LineChart};
use crate::views::{format_signed_percent, Escaped};

pub struct StatsPage<'a> {
    pub monthly: &'a [SeriesPoint],
    pub yearly: &'a [SeriesPoint],
    pub allocation: &'a [AllocationSlice],
    pub risks: &'a [RiskMetric],
    pub holdings: &'a [Holding],
}

impl StatsPage<'_> {
    /// Best and worst holding by gain percentage
    fn extremes(&self) -> Option<(&Holding, &Holding)> {
        let by_perf = |a: &&Holding, b: &&Holding| a.gain_percent().total_cmp(&b.gain_percent());
        let best = self.holdings.iter().max_by(by_perf)?;
        let worst = self.holdings.iter().min_by(by_perf)?;
        Some((best, worst))
    }
}

impl fmt::Display for StatsPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(r#"<h1 class="page-title">Mes Statistiques</h1><div class="summary-cards">"#)?;
        if let Some(last) = self.monthly.last() {
            write!(
                f,
                r#"<div class="summary-card"><p>Performance YTD</p><strong>{}</strong></div>"#,
                format_signed_percent(last.value)
            )?;
        }
        write!(
            f,
            r#"<div class="summary-card"><p>Total des Produits</p><strong>{}</strong></div>"#,
            self.holdings.len()
        )?;
        if let Some((best, worst)) = self.extremes() {
            for (title, h) in [("Meilleur Produit", best), ("Pire Produit", worst)] {
                write!(
                    f,
                    r#"<div class="summary-card"><p>{title}</p><strong>{}</strong><span>{}</span></div>"#,
                    Escaped(&h.product.name),
                    format_signed_percent(h.gain_percent())
                )?;
            }
        }
        f.write_str("</div>")?;

        write!(
            f,
            r#"<div class="charts-grid">{}{}<div class="chart-card"><h3>Répartition des Actifs</h3>{}</div></div>"#,
            LineChart {
                title: "Performance mensuelle",
                points: self.monthly,
                color: "#3B82F6",
            },
            BarChart {
                title: "Comparaison annuelle",
                points: self.yearly,
                color: "#10B981",
            },
            DonutChart {
                slices: self.allocation,
            }
        )?;

        f.write_str(r#"<section class="panel"><h2>Métriques de Risque</h2><div class="risk-grid">"#)?;
        for metric in self.risks {
            write!(
                f,
                r#"<div class="risk-card {}"><p>{}</p><strong>{}</strong><span class="trend">{}</span><small>{}</small></div>"#,
                metric.trend.css_class(),
                Escaped(&metric.label),
                Escaped(&metric.value),
                metric.trend.arrow(),
                Escaped(&metric.description)
            )?;
        }
        f.write_str("</div></section>\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::showcase::{
        asset_allocation, holdings, monthly_performance, risk_metrics, yearly_comparison,
    };

    #[test]
    fn test_stats_page() {
        let monthly = monthly_performance();
        let yearly = yearly_comparison();
        let allocation = asset_allocation();
        let risks = risk_metrics();
        let holdings = holdings();
        let html = StatsPage {
            monthly: &monthly,
            yearly: &yearly,
            allocation: &allocation,
            risks: &risks,
            holdings: &holdings,
        }
        .to_string();
        assert!(html.contains("+6.2%"));
        assert!(html.contains("line-chart"));
        assert!(html.contains("bar-chart"));
        assert!(html.contains("donut-chart"));
        assert_eq!(html.matches("risk-card").count(), risks.len());
        assert!(html.contains("Meilleur Produit"));
    }

    #[test]
    fn test_stats_page_without_holdings() {
        let html = StatsPage {
            monthly: &[],
            yearly: &[],
            allocation: &[],
            risks: &[],
            holdings: &[],
        }
        .to_string();
        assert!(!html.contains("Meilleur Produit"));
        assert!(html.contains("Aucune donnée"));
    }
}
