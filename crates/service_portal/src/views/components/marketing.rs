//! Home page sections.

use std::fmt;

use portal_core::showcase::{blog_posts, consultant_for_region, team_figures, tools, Consultant};

use super::map::RegionMap;
use crate::views::Escaped;

/// Headline band above the product gallery.
pub struct ProductsIntro;

impl fmt::Display for ProductsIntro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(
            r#"<section class="products-intro">
<h1>15 000 produits structurés analysés</h1>
<div class="intro-bottom">
<p>Chaque produit structuré bénéficie d’un suivi dédié et est accompagné de sa documentation complète, assurant une réponse optimale à vos besoins spécifiques.</p>
<a class="button-outline" href="/nos-produits">Découvrir nos produits <span aria-hidden="true">→</span></a>
</div>
</section>
"#,
        )
    }
}

/// Tools band linking into the client space.
pub struct ToolsBand;

impl fmt::Display for ToolsBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(
            r#"<section class="tools-band dark"><h2>Nos outils</h2><p>Créez votre compte pour piloter votre portefeuille et suivre vos produits au quotidien.</p><div class="tools-grid">"#,
        )?;
        for tool in tools() {
            write!(
                f,
                r#"<div class="tool-card"><span class="tool-icon">{}</span><h3>{}</h3><a class="button" href="{}">{}</a></div>"#,
                Escaped(&tool.icon),
                Escaped(&tool.title),
                Escaped(&tool.href),
                Escaped(&tool.button_text)
            )?;
        }
        f.write_str("</div></section>\n")
    }
}

/// Editorial posts.
pub struct BlogSection;

impl fmt::Display for BlogSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(
            r#"<section class="blog-section dark" id="blog"><h2 class="kicker">Nos actualités</h2><h1>Actualités et expertises : <br>restez maîtres des produits structurés</h1><div class="blog-grid">"#,
        )?;
        for post in blog_posts() {
            write!(
                f,
                r#"<article class="blog-card"><p class="blog-category">{}</p><h3>{}</h3><p>{}</p><span class="blog-arrow" aria-hidden="true">→</span></article>"#,
                Escaped(&post.category),
                Escaped(&post.title),
                Escaped(&post.excerpt)
            )?;
        }
        f.write_str("</div></section>\n")
    }
}

/// Advisor panel opened from the map.
pub struct ConsultantCard<'a> {
    pub region_id: &'a str,
    pub consultant: &'a Consultant,
}

impl fmt::Display for ConsultantCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.consultant;
        write!(
            f,
            r#"<aside class="consultant-card" aria-label="Nos conseillers">
<a class="close" href="/#conseillers" aria-label="Fermer">×</a>
<p class="kicker">Nos conseillers</p>
<div class="consultant-head">
<img src="{image}" alt="{name}" width="96" height="96">
<div><h3>{name}</h3><p class="job-title">{job}</p><p class="region">{region}</p></div>
</div>
<div class="consultant-map">{map}</div>
<h4>Présentation</h4>
<p>{summary}</p>
<a class="button" href="{linkedin}" rel="noopener" target="_blank">Voir le profil LinkedIn</a>
</aside>
"#,
            image = Escaped(&c.profile_image),
            name = Escaped(&c.full_name()),
            job = Escaped(&c.job_title),
            region = Escaped(&c.region),
            map = RegionMap {
                selected: Some(self.region_id),
                consultant_mode: true,
            },
            summary = Escaped(&c.summary),
            linkedin = Escaped(&c.linked_in_url),
        )
    }
}

/// Team presentation with the advisor map.
///
/// `selected` comes from `?region=`; a region without an advisor shows the
/// plain map.
pub struct TeamSection<'a> {
    pub selected: Option<&'a str>,
}

impl fmt::Display for TeamSection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(
            r#"<section class="team-section dark" id="conseillers"><div class="team-text">
<h2>Notre équipe</h2><h3>investie dans toutes les régions</h3>
<p>Notre équipe de conseillers financiers experts est présente sur l'ensemble du territoire français pour vous accompagner dans vos projets d'investissement.</p>
<p>Chaque conseiller maîtrise parfaitement les spécificités de sa région et développe une expertise pointue sur les produits structurés adaptés à votre profil.</p>
<p>Découvrez votre conseiller dédié en cliquant sur votre région sur la carte.</p>
<div class="team-figures">"#,
        )?;
        for figure in team_figures() {
            write!(
                f,
                r#"<div class="figure"><span class="value">{}</span><span class="label">{}</span></div>"#,
                Escaped(&figure.value),
                Escaped(&figure.label)
            )?;
        }
        f.write_str("</div></div>")?;

        let consultant = self
            .selected
            .and_then(|id| consultant_for_region(id).map(|c| (id, c)));
        let highlighted = consultant.as_ref().map(|(id, _)| *id);
        write!(
            f,
            r#"<div class="team-map">{}</div>"#,
            RegionMap {
                selected: highlighted,
                consultant_mode: false,
            }
        )?;
        if let Some((region_id, consultant)) = &consultant {
            write!(
                f,
                "{}",
                ConsultantCard {
                    region_id: *region_id,
                    consultant,
                }
            )?;
        }
        f.write_str("</section>\n")
    }
}
