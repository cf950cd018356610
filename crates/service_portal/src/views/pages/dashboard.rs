//! Client-space landing page.

use std::fmt;

use portal_core::portfolio::{unread_count, Alert, AlertKind, Holding, PortfolioSummary};
use portal_core::showcase::ClientProfile;
use portal_core::{Product, User};

use super::portfolio::{holding_href, summary_cards};
use crate::views::components::product_card::detail_href;
use crate::views::{format_eur, format_signed_percent, Escaped};

fn alert_class(kind: AlertKind) -> &'static str {
    match kind {
        AlertKind::Info => "alert-info",
        AlertKind::Warning => "alert-warning",
        AlertKind::Success => "alert-success",
        AlertKind::Error => "alert-error",
    }
}

pub struct DashboardPage<'a> {
    pub user: Option<&'a User>,
    pub client: &'a ClientProfile,
    pub holdings: &'a [Holding],
    pub alerts: &'a [Alert],
    pub wishlist: &'a [Product],
}

impl fmt::Display for DashboardPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self
            .user
            .map(User::display_name)
            .unwrap_or_else(|| self.client.name.clone());
        write!(
            f,
            r#"<h1 class="page-title">Bonjour {}</h1><p class="subtitle">Voici un aperçu de votre portefeuille.</p>"#,
            Escaped(&name)
        )?;
        summary_cards(f, &PortfolioSummary::from_holdings(self.holdings))?;

        f.write_str(r#"<div class="dashboard-grid"><section class="panel"><h2>Mes produits</h2><ul class="holding-list">"#)?;
        for h in self.holdings.iter().take(5) {
            write!(
                f,
                r#"<li><a href="{}">{}</a><span>{}</span><span class="{}">{}</span></li>"#,
                holding_href(&h.product.isin),
                Escaped(&h.product.name),
                format_eur(h.current_value),
                if h.gain() >= 0.0 { "gain" } else { "loss" },
                format_signed_percent(h.gain_percent())
            )?;
        }
        f.write_str(r#"</ul><a class="more" href="/portfolio">Voir tout le portefeuille →</a></section>"#)?;

        write!(
            f,
            r#"<section class="panel"><h2>Alertes <span class="badge">{}</span></h2><ul class="alerts">"#,
            unread_count(self.alerts)
        )?;
        for alert in self.alerts {
            write!(
                f,
                r#"<li class="{}{}"><strong>{}</strong><p>{}</p><time>{}</time></li>"#,
                alert_class(alert.kind),
                if alert.is_read { "" } else { " unread" },
                Escaped(&alert.title),
                Escaped(&alert.message),
                Escaped(&alert.date)
            )?;
        }
        f.write_str("</ul></section>")?;

        f.write_str(r#"<section class="panel"><h2>Produits suivis</h2><ul class="wishlist">"#)?;
        for product in self.wishlist {
            write!(
                f,
                r#"<li><a href="{}">{}</a><small>{} · {}</small></li>"#,
                detail_href(&product.isin),
                Escaped(&product.name),
                Escaped(&product.issuer),
                product.status.label_fr()
            )?;
        }
        f.write_str("</ul></section>")?;

        let advisor = &self.client.advisor;
        write!(
            f,
            r#"<section class="panel advisor"><h2>Votre conseiller</h2><img src="{}" alt="" width="64" height="64"><p><strong>{}</strong></p><p><a href="mailto:{email}">{email}</a></p><p>{}</p></section></div>
"#,
            Escaped(&advisor.photo),
            Escaped(&advisor.name),
            Escaped(&advisor.phone),
            email = Escaped(&advisor.email),
        )
    }
}
