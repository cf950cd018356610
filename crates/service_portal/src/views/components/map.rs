//! Advisor map of the French regions, drawn as a tile cartogram.

use std::fmt;

use portal_core::showcase::{consultant_for_region, regions, Region};

use crate::views::Escaped;

const TILE: u32 = 60;
const GAP: u32 = 4;
const SELECTED_FILL: &str = "#3B82F6";
const BORDER: &str = "#FDE047";

fn abbreviation(name: &str) -> String {
    name.chars().take(3).flat_map(char::to_uppercase).collect()
}

/// Region map.
///
/// Regions with an advisor link to `/?region=<id>`. In consultant mode only
/// the selected region is visible.
pub struct RegionMap<'a> {
    pub selected: Option<&'a str>,
    pub consultant_mode: bool,
}

impl RegionMap<'_> {
    fn tile(&self, f: &mut fmt::Formatter<'_>, region: &Region) -> fmt::Result {
        let selected = self.selected == Some(region.id);
        let clickable = !self.consultant_mode && consultant_for_region(region.id).is_some();
        let hidden = self.consultant_mode && !selected;
        let (fill, opacity) = if selected {
            (SELECTED_FILL, "0.8")
        } else {
            ("transparent", "0")
        };
        let class = if clickable { "region has-consultant" } else { "region" };

        let x = u32::from(region.col) * TILE;
        let y = u32::from(region.row) * TILE;
        let size = TILE - GAP;

        if clickable {
            write!(f, r##"<a href="/?region={}#conseillers">"##, region.id)?;
        }
        write!(
            f,
            r#"<g class="{class}" data-region="{id}"{hidden}><rect x="{x}" y="{y}" width="{size}" height="{size}" rx="6" fill="{fill}" fill-opacity="{opacity}" stroke="{BORDER}" stroke-width="1"/><text x="{tx}" y="{ty}" text-anchor="middle">{abbr}</text><title>{name}</title></g>"#,
            id = region.id,
            hidden = if hidden { r#" visibility="hidden""# } else { "" },
            tx = x + size / 2,
            ty = y + size / 2 + 4,
            abbr = Escaped(&abbreviation(region.name)),
            name = Escaped(region.name),
        )?;
        if clickable {
            f.write_str("</a>")?;
        }
        Ok(())
    }
}

impl fmt::Display for RegionMap<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cols = regions().iter().map(|r| u32::from(r.col)).max().unwrap_or(0) + 1;
        let rows = regions().iter().map(|r| u32::from(r.row)).max().unwrap_or(0) + 1;
        write!(
            f,
            r#"<svg class="region-map{}" viewBox="0 0 {} {}" role="img" aria-label="Carte des régions">"#,
            if self.consultant_mode { " consultant-mode" } else { "" },
            cols * TILE,
            rows * TILE
        )?;
        for region in regions() {
            self.tile(f, region)?;
        }
        f.write_str("</svg>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_advised_regions_are_links() {
        let html = RegionMap {
            selected: None,
            consultant_mode: false,
        }
        .to_string();
        assert_eq!(html.matches("<a href=").count(), 5);
        assert!(html.contains(r#"href="/?region=ile-de-france#conseillers""#));
        assert!(!html.contains(r#"href="/?region=corse"#));
        assert!(!html.contains(SELECTED_FILL));
        assert_eq!(html.matches("<rect").count(), regions().len());
    }

    #[test]
    fn test_selected_region_is_blue() {
        let html = RegionMap {
            selected: Some("occitanie"),
            consultant_mode: false,
        }
        .to_string();
        assert_eq!(html.matches(SELECTED_FILL).count(), 1);
        assert!(!html.contains("visibility=\"hidden\""));
    }

    #[test]
    fn test_consultant_mode_hides_others() {
        let html = RegionMap {
            selected: Some("occitanie"),
            consultant_mode: true,
        }
        .to_string();
        assert_eq!(
            html.matches("visibility=\"hidden\"").count(),
            regions().len() - 1
        );
        assert!(!html.contains("<a href="));
        assert!(html.contains(r#"data-region="occitanie">"#));
    }

    #[test]
    fn test_abbreviation() {
        assert_eq!(abbreviation("Île-de-France"), "ÎLE");
        assert_eq!(abbreviation("Corse"), "COR");
    }
}
