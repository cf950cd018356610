//! Preferences form.

use std::fmt;

use infra_session::preferences::{
    CURRENCIES, DATE_FORMATS, LANGUAGES, SESSION_TIMEOUTS, THEMES, VISIBILITIES,
};
use infra_session::{NavigationStyle, Preferences};

use crate::views::Escaped;

pub struct SettingsPage<'a> {
    pub preferences: &'a Preferences,
    pub saved: bool,
    pub error: Option<&'a str>,
}

fn toggle(f: &mut fmt::Formatter<'_>, name: &str, label: &str, checked: bool) -> fmt::Result {
    write!(
        f,
        r#"<label class="toggle"><input type="checkbox" name="{name}"{}> {label}</label>"#,
        if checked { " checked" } else { "" }
    )
}

fn select(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    label: &str,
    options: &[(&str, &str)],
    current: &str,
) -> fmt::Result {
    write!(f, r#"<label>{label} <select name="{name}">"#)?;
    for (value, text) in options {
        write!(
            f,
            r#"<option value="{}"{}>{}</option>"#,
            Escaped(value),
            if *value == current { " selected" } else { "" },
            Escaped(text)
        )?;
    }
    f.write_str("</select></label>")
}

impl fmt::Display for SettingsPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.preferences;
        f.write_str(r#"<h1 class="page-title">Paramètres</h1>"#)?;
        if self.saved {
            f.write_str(r#"<p class="notice success">Vos préférences ont été enregistrées.</p>"#)?;
        }
        if let Some(error) = self.error {
            write!(f, r#"<p class="form-error" role="alert">{}</p>"#, Escaped(error))?;
        }
        f.write_str(r#"<form class="settings" method="post" action="/settings">"#)?;

        f.write_str(r#"<fieldset><legend>Notifications</legend>"#)?;
        toggle(f, "email_notifications", "Notifications par email", p.email_notifications)?;
        toggle(f, "sms_notifications", "Notifications par SMS", p.sms_notifications)?;
        toggle(f, "push_notifications", "Notifications push", p.push_notifications)?;
        toggle(f, "market_alerts", "Alertes de marché", p.market_alerts)?;
        toggle(f, "portfolio_updates", "Mises à jour du portefeuille", p.portfolio_updates)?;
        toggle(f, "news_updates", "Actualités", p.news_updates)?;
        f.write_str("</fieldset>")?;

        f.write_str(r#"<fieldset><legend>Confidentialité</legend>"#)?;
        select(f, "profile_visibility", "Visibilité du profil", &VISIBILITIES, &p.profile_visibility)?;
        toggle(f, "data_sharing", "Partage des données", p.data_sharing)?;
        toggle(f, "marketing_emails", "Emails marketing", p.marketing_emails)?;
        f.write_str("</fieldset>")?;

        f.write_str(r#"<fieldset><legend>Affichage</legend>"#)?;
        select(f, "language", "Langue", &LANGUAGES, &p.language)?;
        select(f, "theme", "Thème", &THEMES, &p.theme)?;
        select(f, "currency", "Devise", &CURRENCIES, &p.currency)?;
        let formats: Vec<(&str, &str)> = DATE_FORMATS.iter().map(|d| (*d, *d)).collect();
        select(f, "date_format", "Format de date", &formats, &p.date_format)?;
        f.write_str(r#"<div class="radio-group"><span>Navigation</span>"#)?;
        for style in [NavigationStyle::Vertical, NavigationStyle::Horizontal] {
            write!(
                f,
                r#"<label><input type="radio" name="navigation_style" value="{}"{}> {}</label>"#,
                style.as_str(),
                if style == p.navigation_style { " checked" } else { "" },
                style.label()
            )?;
        }
        f.write_str("</div></fieldset>")?;

        f.write_str(r#"<fieldset><legend>Sécurité</legend>"#)?;
        toggle(f, "two_factor_auth", "Authentification à deux facteurs", p.two_factor_auth)?;
        let timeouts: Vec<(String, String)> = SESSION_TIMEOUTS
            .iter()
            .map(|m| (m.to_string(), format!("{m} minutes")))
            .collect();
        let timeouts: Vec<(&str, &str)> = timeouts.iter().map(|(v, l)| (v.as_str(), l.as_str())).collect();
        select(
            f,
            "session_timeout",
            "Expiration de session",
            &timeouts,
            &p.session_timeout_minutes.to_string(),
        )?;
        f.write_str("</fieldset>")?;

        f.write_str(r#"<fieldset><legend>Investissement</legend>"#)?;
        toggle(f, "risk_warnings", "Avertissements de risque", p.risk_warnings)?;
        toggle(f, "confirm_trades", "Confirmation des opérations", p.confirm_trades)?;
        toggle(f, "auto_invest", "Investissement automatique", p.auto_invest)?;
        f.write_str("</fieldset>")?;

        f.write_str(r#"<button type="submit" class="button">Enregistrer</button></form>"#)?;
        f.write_str("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_rendered() {
        let prefs = Preferences::default();
        let html = SettingsPage {
            preferences: &prefs,
            saved: false,
            error: None,
        }
        .to_string();
        assert!(html.contains(r#"name="email_notifications" checked"#));
        assert!(html.contains(r#"<input type="checkbox" name="sms_notifications">"#));
        assert!(html.contains(r#"<option value="fr" selected>"#));
        assert!(html.contains(r#"<option value="30" selected>30 minutes</option>"#));
        assert!(html.contains(r#"value="vertical" checked"#));
        assert!(!html.contains("notice success"));
    }

    #[test]
    fn test_saved_and_error_banners() {
        let prefs = Preferences {
            navigation_style: NavigationStyle::Horizontal,
            ..Preferences::default()
        };
        let html = SettingsPage {
            preferences: &prefs,
            saved: true,
            error: Some("Valeur invalide"),
        }
        .to_string();
        assert!(html.contains("notice success"));
        assert!(html.contains("Valeur invalide"));
        assert!(html.contains(r#"value="horizontal" checked"#));
    }
}
