//! Page shells: the public site and the client space.

use std::fmt;

use infra_session::NavigationStyle;
use portal_core::User;

use super::Escaped;

const SITE_NAME: &str = "Structura";

fn document_head(f: &mut fmt::Formatter<'_>, title: &str, body_class: &str) -> fmt::Result {
    write!(
        f,
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | {SITE_NAME}</title>
<link rel="icon" href="/static/logo.svg" type="image/svg+xml">
<link rel="stylesheet" href="/static/portal.css">
</head>
<body class="{body_class}">
"#,
        title = Escaped(title),
    )
}

fn footer(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
        f,
        r#"<footer class="site-footer">
<div class="footer-brand"><img src="/static/logo.svg" alt="" width="28" height="28"> {SITE_NAME}</div>
<nav class="footer-links">
<a href="/nos-produits">Nos produits</a>
<a href="/#conseillers">Nos conseillers</a>
<a href="/#blog">Actualités</a>
<a href="/login">Espace client</a>
</nav>
<p class="footer-legal">Les produits structurés présentent un risque de perte en capital. Les performances passées ne préjugent pas des performances futures.</p>
</footer>
"#
    )
}

/// Public site shell.
pub struct PublicLayout<'a, B> {
    /// Title suffix of the `<title>` tag
    pub title: &'a str,
    /// Path of the highlighted menu entry
    pub active: &'a str,
    /// Signed-in user, if any
    pub user: Option<&'a User>,
    /// Page content
    pub body: B,
}

impl<B: fmt::Display> fmt::Display for PublicLayout<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        document_head(f, self.title, "public")?;
        f.write_str(r#"<header class="site-header"><a class="brand" href="/"><img src="/static/logo.svg" alt="" width="32" height="32"> "#)?;
        f.write_str(SITE_NAME)?;
        f.write_str(r#"</a><nav class="site-nav">"#)?;
        for (href, label) in [("/", "Accueil"), ("/nos-produits", "Nos produits")] {
            let class = if self.active == href { " class=\"active\"" } else { "" };
            write!(f, r#"<a href="{href}"{class}>{label}</a>"#)?;
        }
        match self.user {
            Some(user) => write!(
                f,
                r#"<a class="button" href="/dashboard">Espace client ({})</a>"#,
                Escaped(&user.display_name())
            )?,
            None => f.write_str(
                r#"<a class="button-outline" href="/register">Créer un compte</a><a class="button" href="/login">Connexion</a>"#,
            )?,
        }
        f.write_str("</nav></header>\n<main class=\"site-main\">\n")?;
        write!(f, "{}", self.body)?;
        f.write_str("</main>\n")?;
        footer(f)?;
        f.write_str("</body>\n</html>\n")
    }
}

/// Client-space menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalNav {
    Dashboard,
    Portfolio,
    Stats,
    Documents,
    Settings,
    Profile,
}

impl PortalNav {
    /// Entries of the main menu in display order
    pub const MENU: [PortalNav; 4] = [
        PortalNav::Dashboard,
        PortalNav::Portfolio,
        PortalNav::Stats,
        PortalNav::Documents,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            PortalNav::Dashboard => "/dashboard",
            PortalNav::Portfolio => "/portfolio",
            PortalNav::Stats => "/stats",
            PortalNav::Documents => "/documents",
            PortalNav::Settings => "/settings",
            PortalNav::Profile => "/profile",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PortalNav::Dashboard => "Accueil",
            PortalNav::Portfolio => "Mon Portefeuille",
            PortalNav::Stats => "Mes Stats",
            PortalNav::Documents => "Documents",
            PortalNav::Settings => "Paramètres",
            PortalNav::Profile => "Mon profil",
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            PortalNav::Dashboard => "⌂",
            PortalNav::Portfolio => "▣",
            PortalNav::Stats => "▤",
            PortalNav::Documents => "▧",
            PortalNav::Settings => "⚙",
            PortalNav::Profile => "◉",
        }
    }
}

/// Client-space shell with the navigation the user picked in settings.
pub struct PortalLayout<'a, B> {
    pub title: &'a str,
    pub active: PortalNav,
    pub user: Option<&'a User>,
    pub navigation: NavigationStyle,
    pub body: B,
}

impl<B> PortalLayout<'_, B> {
    fn user_menu(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, initials) = match self.user {
            Some(user) => (user.display_name(), user.initials()),
            None => ("Client".to_string(), "C".to_string()),
        };
        write!(
            f,
            r#"<details class="user-menu"><summary><span class="avatar">{}</span><span class="user-name">{}</span></summary><div class="user-dropdown">"#,
            Escaped(&initials),
            Escaped(&name)
        )?;
        for item in [PortalNav::Profile, PortalNav::Settings] {
            write!(f, r#"<a href="{}">{}</a>"#, item.path(), item.label())?;
        }
        f.write_str(r#"<form method="post" action="/logout"><button type="submit">Déconnexion</button></form></div></details>"#)
    }
}

impl<B: fmt::Display> fmt::Display for PortalLayout<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let style = self.navigation.as_str();
        document_head(f, self.title, &format!("portal nav-{style}"))?;

        write!(
            f,
            r#"<header class="portal-header"><a class="brand" href="/"><img src="/static/logo.svg" alt="" width="32" height="32"> {SITE_NAME}</a>"#
        )?;
        if self.navigation == NavigationStyle::Horizontal {
            f.write_str(r#"<nav class="portal-tabs">"#)?;
            for item in PortalNav::MENU {
                let class = if item == self.active { " active" } else { "" };
                write!(f, r#"<a class="tab{class}" href="{}">{}</a>"#, item.path(), item.label())?;
            }
            f.write_str("</nav>")?;
        }
        self.user_menu(f)?;
        f.write_str("</header>\n")?;

        f.write_str(r#"<div class="portal-frame">"#)?;
        if self.navigation == NavigationStyle::Vertical {
            f.write_str(r#"<nav class="portal-rail">"#)?;
            for item in PortalNav::MENU {
                let class = if item == self.active { " active" } else { "" };
                write!(
                    f,
                    r#"<a class="rail-item{class}" href="{}" title="{label}"><span class="nav-icon">{}</span><span class="nav-label">{label}</span></a>"#,
                    item.path(),
                    item.icon(),
                    label = item.label()
                )?;
            }
            f.write_str("</nav>")?;
        }
        write!(f, "<main class=\"portal-main\">\n{}</main></div>\n", self.body)?;
        f.write_str("</body>\n</html>\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::Role;

    fn user() -> User {
        User {
            id: 1,
            username: "jdupont".into(),
            email: "jean@example.com".into(),
            role: Role::Client,
            first_name: "Jean".into(),
            last_name: "<Dupont>".into(),
        }
    }

    #[test]
    fn test_public_layout_anonymous() {
        let html = PublicLayout {
            title: "Nos produits",
            active: "/nos-produits",
            user: None,
            body: "<p>contenu</p>",
        }
        .to_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Nos produits | Structura</title>"));
        assert!(html.contains(r#"<a href="/nos-produits" class="active">"#));
        assert!(html.contains(r#"href="/login""#));
        assert!(html.contains("<p>contenu</p>"));
    }

    #[test]
    fn test_public_layout_escapes_user_name() {
        let u = user();
        let html = PublicLayout {
            title: "Accueil",
            active: "/",
            user: Some(&u),
            body: "",
        }
        .to_string();
        assert!(html.contains("Jean &lt;Dupont&gt;"));
        assert!(!html.contains("<Dupont>"));
    }

    #[test]
    fn test_portal_layout_navigation_styles() {
        let u = User {
            last_name: "Dupont".into(),
            ..user()
        };
        let vertical = PortalLayout {
            title: "Tableau de bord",
            active: PortalNav::Stats,
            user: Some(&u),
            navigation: NavigationStyle::Vertical,
            body: "",
        }
        .to_string();
        assert!(vertical.contains("portal-rail"));
        assert!(!vertical.contains("portal-tabs"));
        assert!(vertical.contains(r#"class="rail-item active" href="/stats""#));

        let horizontal = PortalLayout {
            title: "Tableau de bord",
            active: PortalNav::Portfolio,
            user: Some(&u),
            navigation: NavigationStyle::Horizontal,
            body: "",
        }
        .to_string();
        assert!(horizontal.contains("portal-tabs"));
        assert!(!horizontal.contains("portal-rail"));
        assert!(horizontal.contains(r#"class="tab active" href="/portfolio""#));
        assert!(horizontal.contains(r#"action="/logout""#));
        assert!(horizontal.contains(">JD<"));
    }
}
