//! Product cards and the family-grouped gallery.

use std::fmt;

use portal_core::{Family, Product};

use crate::views::{encode_query, Escaped};

/// Link to the public detail page of `isin`
pub fn detail_href(isin: &str) -> String {
    format!("/nos-produits/{}", encode_query(isin))
}

/// Catalog card of one product.
pub struct ProductCard<'a>(pub &'a Product);

impl fmt::Display for ProductCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.0;
        write!(
            f,
            r#"<article class="product-card family-{family}">
<h3 class="product-name">{name}</h3>
<p class="start-date">{start}</p>
<a class="discover" href="{href}">Découvrir <span aria-hidden="true">→</span></a>
<div class="card-footer">
<p class="isin">{isin}</p>
<p class="issuer">{issuer}</p>
<p class="underlying">{underlying}</p>
<span class="status-bar status-{slug}" title="{status}"></span>
<p class="status-label">{label}</p>
</div>
</article>
"#,
            family = p.family.as_str(),
            name = Escaped(&p.name),
            start = Escaped(&p.start_date),
            href = detail_href(&p.isin),
            isin = Escaped(&p.isin),
            issuer = Escaped(&p.issuer),
            underlying = Escaped(&p.underlying),
            slug = p.status.slug(),
            status = p.status.as_str(),
            label = p.status.label_fr(),
        )
    }
}

/// Products bucketed by family, in catalog order; empty families are dropped.
pub fn group_by_family(products: &[Product]) -> Vec<(Family, Vec<&Product>)> {
    Family::ALL
        .into_iter()
        .map(|family| {
            let members: Vec<&Product> = products.iter().filter(|p| p.family == family).collect();
            (family, members)
        })
        .filter(|(_, members)| !members.is_empty())
        .collect()
}

/// Grid of cards grouped under one heading per family.
pub struct ProductGallery<'a> {
    pub products: &'a [Product],
}

impl fmt::Display for ProductGallery<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.products.is_empty() {
            return f.write_str(r#"<p class="empty">Aucun produit ne correspond à votre recherche.</p>"#);
        }
        f.write_str(r#"<div class="product-gallery">"#)?;
        for (family, members) in group_by_family(self.products) {
            write!(
                f,
                r#"<section class="family-group" id="famille-{}"><h2>{} <span class="count">{}</span></h2><div class="card-grid">"#,
                family.as_str(),
                family.label(),
                members.len()
            )?;
            for product in members {
                write!(f, "{}", ProductCard(product))?;
            }
            f.write_str("</div></section>")?;
        }
        f.write_str("</div>\n")
    }
}
