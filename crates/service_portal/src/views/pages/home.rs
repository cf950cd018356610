//! Marketing home page.

use std::fmt;

use portal_core::Product;
use serde::Deserialize;

use crate::views::components::{BlogSection, ProductGallery, ProductsIntro, TeamSection, ToolsBand};

/// Query string of `/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HomeQuery {
    /// Region picked on the advisor map
    #[serde(default)]
    pub region: Option<String>,
}

pub struct HomePage<'a> {
    pub products: &'a [Product],
    pub region: Option<&'a str>,
}

impl fmt::Display for HomePage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(
            r#"<section class="hero dark" id="qui-sommes-nous">
<h1>L'expertise des produits structurés</h1>
<p>Analyse indépendante, suivi quotidien et conseillers dédiés partout en France.</p>
<div class="hero-actions"><a class="button" href="/nos-produits">Nos produits</a><a class="button-outline" href="/register">Commencer</a></div>
</section>
"#,
        )?;
        write!(f, "{}", ProductsIntro)?;
        write!(f, "{}", ProductGallery { products: self.products })?;
        write!(f, "{}", ToolsBand)?;
        write!(f, "{}", TeamSection { selected: self.region })?;
        write!(f, "{}", BlogSection)
    }
}
