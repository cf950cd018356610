//! Marketing site content: editorial posts, tools, advisor network.

use serde::Serialize;

use crate::product::{Analysis, Characteristics, Family, Product, ProductStatus};

/// Editorial post shown in the blog section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct BlogPost {
    pub title: String,
    pub category: String,
    pub excerpt: String,
}

/// Card of the tools band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct Tool {
    pub title: String,
    pub icon: String,
    pub button_text: String,
    /// Link target of the button
    pub href: String,
}

/// Headline figure of the team section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct TeamFigure {
    pub value: String,
    pub label: String,
}

/// Regional advisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct Consultant {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub job_title: String,
    /// Region display name
    pub region: String,
    pub linked_in_url: String,
    pub profile_image: String,
    pub summary: String,
}

impl Consultant {
    /// `First Last`
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Region of the advisor map, placed on a tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region {
    /// Slug used in URLs (`?region=`)
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Tile column
    pub col: u8,
    /// Tile row
    pub row: u8,
}

const REGIONS: [Region; 13] = [
    Region { id: "hauts-de-france", name: "Hauts-de-France", col: 2, row: 0 },
    Region { id: "bretagne", name: "Bretagne", col: 0, row: 1 },
    Region { id: "normandie", name: "Normandie", col: 1, row: 1 },
    Region { id: "ile-de-france", name: "Île-de-France", col: 2, row: 1 },
    Region { id: "grand-est", name: "Grand Est", col: 3, row: 1 },
    Region { id: "pays-de-la-loire", name: "Pays de la Loire", col: 1, row: 2 },
    Region { id: "centre-val-de-loire", name: "Centre-Val de Loire", col: 2, row: 2 },
    Region { id: "bourgogne-franche-comte", name: "Bourgogne-Franche-Comté", col: 3, row: 2 },
    Region { id: "nouvelle-aquitaine", name: "Nouvelle-Aquitaine", col: 1, row: 3 },
    Region { id: "auvergne-rhone-alpes", name: "Auvergne-Rhône-Alpes", col: 2, row: 3 },
    Region { id: "provence-alpes-cote-azur", name: "Provence-Alpes-Côte d'Azur", col: 3, row: 3 },
    Region { id: "occitanie", name: "Occitanie", col: 2, row: 4 },
    Region { id: "corse", name: "Corse", col: 4, row: 4 },
];

/// Mainland regions plus Corsica, in tile order.
pub fn regions() -> &'static [Region] {
    &REGIONS
}

/// Region slug for a display name.
///
/// Known names use the fixed table; anything else is lowercased with every
/// character outside `[a-z0-9]` replaced by `-`.
///
/// # Examples
/// ```
/// use portal_core::showcase::region_id_from_name;
///
/// assert_eq!(region_id_from_name("Provence-Alpes-Côte d'Azur"), "provence-alpes-cote-azur");
/// assert_eq!(region_id_from_name("Guyane Française"), "guyane-fran-aise");
/// ```
pub fn region_id_from_name(name: &str) -> String {
    if let Some(region) = REGIONS.iter().find(|r| r.name == name) {
        return region.id.to_string();
    }
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '-' })
        .collect()
}

fn consultant(
    id: &str,
    first: &str,
    last: &str,
    job: &str,
    region: &str,
    summary: &str,
) -> Consultant {
    let slug = format!("{}-{}", first, last).to_lowercase();
    Consultant {
        id: id.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        job_title: job.to_string(),
        region: region.to_string(),
        linked_in_url: format!("https://linkedin.com/in/{slug}"),
        profile_image: format!("/static/consultants/{slug}.jpg"),
        summary: summary.to_string(),
    }
}

/// Advisors keyed by region slug, in region order.
pub fn consultants() -> Vec<(&'static str, Consultant)> {
    vec![
        (
            "ile-de-france",
            consultant(
                "1",
                "Marie",
                "Martin",
                "Conseillère Financière Senior",
                "Île-de-France",
                "Spécialisée dans les produits structurés depuis 8 ans, Marie accompagne les investisseurs institutionnels et privés de la région parisienne.",
            ),
        ),
        (
            "auvergne-rhone-alpes",
            consultant(
                "2",
                "Pierre",
                "Dubois",
                "Conseiller Financier",
                "Auvergne-Rhône-Alpes",
                "Expert en investissements alternatifs, Pierre développe notre présence dans la région Rhône-Alpes avec une approche personnalisée.",
            ),
        ),
        (
            "provence-alpes-cote-azur",
            consultant(
                "3",
                "Sophie",
                "Lefebvre",
                "Conseillère Patrimoine",
                "Provence-Alpes-Côte d'Azur",
                "Forte de 12 ans d'expérience en gestion de patrimoine, Sophie conseille une clientèle haut de gamme sur la Côte d'Azur.",
            ),
        ),
        (
            "occitanie",
            consultant(
                "4",
                "Thomas",
                "Moreau",
                "Conseiller Investissement",
                "Occitanie",
                "Thomas développe notre activité dans le Sud-Ouest avec une expertise particulière sur les produits à capital garanti.",
            ),
        ),
        (
            "nouvelle-aquitaine",
            consultant(
                "5",
                "Claire",
                "Bernard",
                "Conseillère Financière",
                "Nouvelle-Aquitaine",
                "Spécialisée dans l'accompagnement des entreprises familiales, Claire apporte son expertise sur toute la région Nouvelle-Aquitaine.",
            ),
        ),
    ]
}

/// Advisor covering `region_id`, if any.
pub fn consultant_for_region(region_id: &str) -> Option<Consultant> {
    consultants()
        .into_iter()
        .find(|(id, _)| *id == region_id)
        .map(|(_, c)| c)
}

/// Posts of the blog section.
pub fn blog_posts() -> Vec<BlogPost> {
    [
        (
            "Pourquoi les investisseurs devraient se soucier de la politique monétaire ?",
            "Actualités",
            "La politique monétaire, souvent perçue comme un domaine réservé aux économistes et aux banquiers centraux, façonne pourtant le rendement de chaque produit structuré.",
        ),
        (
            "Lettre Annuelle 2024",
            "Lettre Annuelle",
            "Alors que 2024 touche à sa fin, nous souhaitons vous remercier de votre confiance et de votre collaboration tout au long de l'année.",
        ),
        (
            "Février 2025",
            "Performances",
            "En février 2025, l'économie européenne a montré une faible dynamique, avec une croissance quasi nulle et une inflation en léger recul à 2,4 %.",
        ),
        (
            "Notre analyse dans la presse",
            "Presse",
            "Pour plus d'analyse sur les produits structurés, contactez-nous : contact@structura.fr",
        ),
    ]
    .into_iter()
    .map(|(title, category, excerpt)| BlogPost {
        title: title.to_string(),
        category: category.to_string(),
        excerpt: excerpt.to_string(),
    })
    .collect()
}

/// Cards of the tools band.
pub fn tools() -> Vec<Tool> {
    [
        ("Pilotez votre Portefeuille", "tool-portfolio", "/dashboard"),
        ("Retrouvez nos 15 000 produits structurés", "tool-catalog", "/nos-produits"),
        (
            "Découvrez la première marketplace dédiée aux produits structurés",
            "tool-marketplace",
            "/nos-produits",
        ),
        ("Développez votre expertise avec notre encyclopédie", "tool-encyclopedia", "/#blog"),
    ]
    .into_iter()
    .map(|(title, icon, href)| Tool {
        title: title.to_string(),
        icon: icon.to_string(),
        button_text: "Votre espace personnel".to_string(),
        href: href.to_string(),
    })
    .collect()
}

/// Headline figures of the team section.
pub fn team_figures() -> Vec<TeamFigure> {
    vec![
        TeamFigure {
            value: "12".to_string(),
            label: "Régions couvertes".to_string(),
        },
        TeamFigure {
            value: "15+".to_string(),
            label: "Conseillers experts".to_string(),
        },
    ]
}

#[allow(clippy::too_many_arguments)]
fn sample(
    name: &str,
    isin: &str,
    status: ProductStatus,
    family: Family,
    summary: &str,
    issuer: &str,
    currency: &str,
    underlying: &str,
    coupon: &str,
    barriers: [&str; 3],
    observations: &str,
) -> Product {
    let [coupon_barrier, call_barrier, protection_barrier] = barriers;
    Product {
        name: name.to_string(),
        start_date: "Fév. 2025".to_string(),
        isin: isin.to_string(),
        issuer: issuer.to_string(),
        underlying: underlying.to_string(),
        status,
        family,
        summary: Some(summary.to_string()),
        characteristics: Some(Characteristics {
            emetteur: issuer.to_string(),
            devise: currency.to_string(),
            categorie: family.label().to_string(),
            sous_jacents: underlying.to_string(),
            barriere_coupon: coupon_barrier.to_string(),
            observations: observations.to_string(),
            coupon: coupon.to_string(),
            niveau_initial: "100%".to_string(),
            barriere_rappel: call_barrier.to_string(),
            barriere_protection: protection_barrier.to_string(),
        }),
        analysis: Some(Analysis {
            analyse_risque: Some(format!(
                "Exposition principale à {underlying}. Le capital est exposé en dessous de la barrière de protection ({protection_barrier})."
            )),
            analyse_technique: Some(format!(
                "Niveau initial fixé à 100% ; barrière de coupon à {coupon_barrier}."
            )),
            analyse_marche: Some(
                "Contexte de taux en baisse favorable aux structures à coupon fixe.".to_string(),
            ),
            analyse_performance: Some(format!("Coupon annuel visé : {coupon}.")),
            recommandation: Some(
                "Adapté à un investisseur acceptant un risque de perte en capital.".to_string(),
            ),
        }),
    }
}

/// Products shown when the data service is unavailable and in the demo portfolio.
pub fn sample_products() -> Vec<Product> {
    vec![
        sample(
            "Autocall CAC 40 Février 2025",
            "FR0012345678",
            ProductStatus::NotStarted,
            Family::Autocall,
            "Produit structuré autocall offrant une protection du capital avec des coupons conditionnels attractifs.",
            "BNP Paribas",
            "EUR",
            "CAC 40",
            "8.5%",
            ["65%", "100%", "65%"],
            "Remboursement anticipé possible",
        ),
        sample(
            "CLN S&P 500 Diversifiée",
            "FR0012345679",
            ProductStatus::Started,
            Family::Cln,
            "Note de crédit liée offrant une exposition diversifiée avec protection partielle.",
            "Société Générale",
            "USD",
            "S&P 500",
            "6.2%",
            ["70%", "95%", "70%"],
            "Exposition au risque de crédit",
        ),
        sample(
            "Participation Euro Stoxx 50",
            "FR0012345680",
            ProductStatus::Ended,
            Family::Participation,
            "Certificat de participation permettant de bénéficier de la hausse des marchés.",
            "Goldman Sachs",
            "EUR",
            "Euro Stoxx 50",
            "Variable",
            ["N/A", "N/A", "80%"],
            "Participation à 120%",
        ),
        sample(
            "Phoenix Mémoire Actions Européennes",
            "FR0012345681",
            ProductStatus::Reimbursed,
            Family::Phoenix,
            "Produit Phoenix avec mécanisme de coupon mémoire et protection du capital.",
            "Crédit Agricole",
            "EUR",
            "Panier d'actions",
            "9.5%",
            ["60%", "100%", "60%"],
            "Coupon mémoire",
        ),
        sample(
            "Protection SMI 100%",
            "FR0012345682",
            ProductStatus::NotStarted,
            Family::Protection,
            "Produit à capital protégé offrant une sécurité maximale avec rendement garanti.",
            "HSBC",
            "CHF",
            "SMI",
            "4.8%",
            ["90%", "100%", "100%"],
            "Capital 100% protégé",
        ),
        sample(
            "Reverse Convertible TotalEnergies",
            "FR0012345683",
            ProductStatus::Started,
            Family::Reverse,
            "Produit reverse convertible avec coupon élevé et risque de livraison d'actions.",
            "UBS",
            "EUR",
            "TotalEnergies",
            "12.5%",
            ["N/A", "N/A", "75%"],
            "Risque de livraison",
        ),
    ]
}
