//! Public catalog: list with filters and the product detail sheet.

use std::fmt;

use adapter_backend::ProductQuery;
use portal_core::{Family, Product, ProductStatus};
use serde::Deserialize;

use crate::views::components::ProductGallery;
use crate::views::Escaped;

/// Ordering of the catalog list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Order returned by the data service (latest first)
    #[default]
    Recent,
    Name,
    Issuer,
}

impl SortOrder {
    pub const ALL: [SortOrder; 3] = [SortOrder::Recent, SortOrder::Name, SortOrder::Issuer];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Recent => "recent",
            SortOrder::Name => "name",
            SortOrder::Issuer => "issuer",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Recent => "Date de création",
            SortOrder::Name => "Nom",
            SortOrder::Issuer => "Émetteur",
        }
    }

    fn parse(raw: Option<&str>) -> Self {
        raw.and_then(|s| SortOrder::ALL.into_iter().find(|o| o.as_str() == s.trim()))
            .unwrap_or_default()
    }
}

/// Query string of `/nos-produits`.
///
/// Unknown family or status values are ignored rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CatalogFilter {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
}

impl CatalogFilter {
    fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn family(&self) -> Option<Family> {
        self.family.as_deref().and_then(|f| f.parse().ok())
    }

    pub fn status(&self) -> Option<ProductStatus> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }

    pub fn sort_order(&self) -> SortOrder {
        SortOrder::parse(self.sort.as_deref())
    }

    /// Data service query carrying the filters it understands
    pub fn backend_query(&self) -> ProductQuery {
        ProductQuery {
            search: self.search_term().map(str::to_string),
            family: self.family().map(|f| f.label().to_string()),
            ..Default::default()
        }
    }

    /// Filter and sort `products` locally.
    pub fn apply(&self, mut products: Vec<Product>) -> Vec<Product> {
        let family = self.family();
        let status = self.status();
        products.retain(|p| {
            self.search_term().map_or(true, |needle| p.matches_search(needle))
                && family.map_or(true, |f| p.family == f)
                && status.map_or(true, |s| p.status == s)
        });
        match self.sort_order() {
            SortOrder::Recent => {}
            SortOrder::Name => products.sort_by_key(|p| p.name.to_lowercase()),
            SortOrder::Issuer => {
                products.sort_by(|a, b| {
                    a.issuer
                        .to_lowercase()
                        .cmp(&b.issuer.to_lowercase())
                        .then_with(|| a.name.cmp(&b.name))
                })
            }
        }
        products
    }
}

fn selected(yes: bool) -> &'static str {
    if yes {
        " selected"
    } else {
        ""
    }
}

/// Catalog page.
pub struct CatalogPage<'a> {
    pub filter: &'a CatalogFilter,
    pub products: &'a [Product],
    /// Shown above the list, e.g. when the data service is unavailable
    pub notice: Option<&'a str>,
}

impl CatalogPage<'_> {
    fn filters(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let family = self.filter.family();
        let status = self.filter.status();
        let sort = self.filter.sort_order();

        write!(
            f,
            r#"<form class="catalog-filters" method="get" action="/nos-produits">
<div class="search-box"><input type="search" name="search" placeholder="Rechercher un produit..." value="{}"><button type="submit">Rechercher</button></div>
<label>Famille <select name="family"><option value="">Toutes</option>"#,
            Escaped(self.filter.search_term().unwrap_or_default())
        )?;
        for candidate in Family::ALL {
            write!(
                f,
                r#"<option value="{}"{}>{}</option>"#,
                candidate.as_str(),
                selected(family == Some(candidate)),
                candidate.label()
            )?;
        }
        f.write_str(r#"</select></label><label>Statut <select name="status"><option value="">Tous</option>"#)?;
        for candidate in ProductStatus::ALL {
            write!(
                f,
                r#"<option value="{}"{}>{}</option>"#,
                candidate.slug(),
                selected(status == Some(candidate)),
                candidate.label_fr()
            )?;
        }
        f.write_str(r#"</select></label><label>Trier par <select name="sort">"#)?;
        for candidate in SortOrder::ALL {
            write!(
                f,
                r#"<option value="{}"{}>{}</option>"#,
                candidate.as_str(),
                selected(sort == candidate),
                candidate.label()
            )?;
        }
        f.write_str(r#"</select></label><button type="submit" class="button">Filtrer</button><a class="reset" href="/nos-produits">Effacer les filtres</a></form>"#)
    }
}

impl fmt::Display for CatalogPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(
            r#"<section class="page-hero dark"><h1>Nos Produits Structurés</h1><p>Découvrez notre gamme complète de produits structurés conçus pour répondre à vos besoins d'investissement. Chaque produit est analysé et suivi par notre équipe d'experts pour vous offrir les meilleures opportunités du marché.</p></section>
<section class="catalog">"#,
        )?;
        self.filters(f)?;
        if let Some(notice) = self.notice {
            write!(f, r#"<p class="notice">{}</p>"#, Escaped(notice))?;
        }
        write!(
            f,
            r#"<h2 class="catalog-count">{} produit{} disponible{}</h2>"#,
            self.products.len(),
            if self.products.len() > 1 { "s" } else { "" },
            if self.products.len() > 1 { "s" } else { "" }
        )?;
        write!(f, "{}", ProductGallery { products: self.products })?;
        f.write_str("</section>\n")
    }
}

/// Product sheet with characteristics and the collapsible desk analysis.
pub struct ProductDetailPage<'a> {
    pub product: &'a Product,
}

impl fmt::Display for ProductDetailPage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.product;
        write!(
            f,
            r#"<section class="page-hero dark product-hero family-{family}"><p class="kicker">{family_label}</p><h1>{name}</h1><p>ISIN : {isin} · Lancement : {start}</p><span class="status-pill status-{slug}">{status}</span></section>
<section class="product-sheet">"#,
            family = p.family.as_str(),
            family_label = p.family.label(),
            name = Escaped(&p.name),
            isin = Escaped(&p.isin),
            start = Escaped(&p.start_date),
            slug = p.status.slug(),
            status = p.status.label_fr(),
        )?;
        if let Some(summary) = &p.summary {
            write!(f, r#"<p class="product-summary">{}</p>"#, Escaped(summary))?;
        }

        f.write_str(r#"<div class="sheet-card"><h2>Caractéristiques du Produit</h2>"#)?;
        match &p.characteristics {
            Some(c) => {
                f.write_str(r#"<dl class="characteristics">"#)?;
                let rows = [
                    ("Émetteur", &c.emetteur),
                    ("Devise", &c.devise),
                    ("Catégorie", &c.categorie),
                    ("Sous-jacents", &c.sous_jacents),
                    ("Barrière de coupon", &c.barriere_coupon),
                    ("Observations", &c.observations),
                    ("Coupon", &c.coupon),
                    ("Niveau Initial", &c.niveau_initial),
                    ("Barrière de rappel", &c.barriere_rappel),
                    ("Barrière de protection", &c.barriere_protection),
                ];
                for (term, value) in rows {
                    write!(f, "<div><dt>{term}</dt><dd>{}</dd></div>", Escaped(value))?;
                }
                f.write_str("</dl>")?;
            }
            None => write!(
                f,
                r#"<dl class="characteristics"><div><dt>Émetteur</dt><dd>{}</dd></div><div><dt>Sous-jacents</dt><dd>{}</dd></div></dl>"#,
                Escaped(&p.issuer),
                Escaped(&p.underlying)
            )?,
        }
        f.write_str("</div>")?;

        let sections = p.analysis.as_ref().map(|a| a.sections()).unwrap_or_default();
        if !sections.is_empty() {
            f.write_str(r#"<div class="sheet-card analysis"><h2>Notre analyse</h2>"#)?;
            for (title, text) in sections {
                write!(
                    f,
                    r#"<details class="collapsible"><summary>{title}</summary><div class="collapsible-body">{}</div></details>"#,
                    Escaped(text)
                )?;
            }
            f.write_str("</div>")?;
        }
        f.write_str(r#"<a class="back-link" href="/nos-produits">← Retour à la liste des produits</a></section>"#)?;
        f.write_str("\n")
    }
}

/// Detail page when the product cannot be shown.
pub struct ProductUnavailable<'a> {
    pub message: &'a str,
}

impl fmt::Display for ProductUnavailable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"<section class="centered-message"><h1>{}</h1><a class="button" href="/nos-produits">Retour à la liste des produits</a></section>
"#,
            Escaped(self.message)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::product::{Analysis, Characteristics};
    use portal_core::showcase::sample_products;

    #[test]
    fn test_filter_parsing() {
        let filter = CatalogFilter {
            search: Some("  ".into()),
            family: Some("Phoenix".into()),
            status: Some("started".into()),
            sort: Some("bogus".into()),
        };
        assert_eq!(filter.family(), Some(Family::Phoenix));
        assert_eq!(filter.status(), Some(ProductStatus::Started));
        assert_eq!(filter.sort_order(), SortOrder::Recent);

        let query = filter.backend_query();
        assert_eq!(query.search, None);
        assert_eq!(query.family.as_deref(), Some("Phoenix"));
    }

    #[test]
    fn test_apply_filters_and_sorts() {
        let products = sample_products();
        let total = products.len();

        let all = CatalogFilter::default().apply(products.clone());
        assert_eq!(all.len(), total);

        let by_name = CatalogFilter {
            sort: Some("name".into()),
            ..Default::default()
        }
        .apply(products.clone());
        let names: Vec<String> = by_name.iter().map(|p| p.name.to_lowercase()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);

        let autocalls = CatalogFilter {
            family: Some("autocall".into()),
            ..Default::default()
        }
        .apply(products);
        assert!(!autocalls.is_empty());
        assert!(autocalls.iter().all(|p| p.family == Family::Autocall));
    }

    #[test]
    fn test_catalog_page_keeps_filter_state() {
        let filter = CatalogFilter {
            search: Some("<cac>".into()),
            family: Some("reverse".into()),
            status: None,
            sort: Some("issuer".into()),
        };
        let html = CatalogPage {
            filter: &filter,
            products: &[],
            notice: Some("Service indisponible"),
        }
        .to_string();
        assert!(html.contains(r#"value="&lt;cac&gt;""#));
        assert!(html.contains(r#"<option value="reverse" selected>"#));
        assert!(html.contains(r#"<option value="issuer" selected>"#));
        assert!(html.contains("Service indisponible"));
        assert!(html.contains("Aucun produit"));
        assert!(html.contains("0 produit disponible"));
    }

    #[test]
    fn test_detail_page_sections() {
        let mut product = sample_products().remove(0);
        product.characteristics = Some(Characteristics {
            emetteur: "BNP Paribas".into(),
            devise: "EUR".into(),
            categorie: "Autocall".into(),
            sous_jacents: "CAC 40".into(),
            barriere_coupon: "70%".into(),
            observations: "Annuelle".into(),
            coupon: "8.5%".into(),
            niveau_initial: "7 500".into(),
            barriere_rappel: "100%".into(),
            barriere_protection: "60%".into(),
        });
        product.analysis = Some(Analysis {
            analyse_risque: Some("Risque modéré".into()),
            recommandation: Some("Conserver".into()),
            ..Default::default()
        });
        let html = ProductDetailPage { product: &product }.to_string();
        assert!(html.contains("<dt>Barrière de protection</dt><dd>60%</dd>"));
        assert_eq!(html.matches("<details class=\"collapsible\">").count(), 2);
        assert!(html.contains("<summary>Recommandation</summary>"));
    }

    #[test]
    fn test_detail_page_without_analysis() {
        let mut product = sample_products().remove(1);
        product.analysis = None;
        product.characteristics = None;
        let html = ProductDetailPage { product: &product }.to_string();
        assert!(!html.contains("Notre analyse"));
        assert!(html.contains("<dt>Émetteur</dt><dd>Société Générale</dd>"));
    }
}
