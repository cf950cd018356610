//! Inline SVG charts.
//!
//! Every chart draws in a `0 0 100 100` viewBox stretched to its container;
//! values are scaled with [`series_bounds`] and [`x_percent`].

use std::fmt;

use portal_core::stats::{series_bounds, x_percent, AllocationSlice, SeriesBounds, SeriesPoint};

use crate::views::{format_eur, Escaped};

const GRID_STROKE: &str = "#E5E7EB";
const POSITIVE: &str = "#10B981";
const NEGATIVE: &str = "#EF4444";

/// Coordinate with at most two decimals and no trailing zeros
fn coord(value: f64) -> String {
    let s = format!("{value:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn positions(points: &[SeriesPoint], bounds: &SeriesBounds) -> Vec<(f64, f64)> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| (x_percent(i, points.len()), bounds.y_percent(p.value)))
        .collect()
}

fn polyline_points(positions: &[(f64, f64)]) -> String {
    positions
        .iter()
        .map(|(x, y)| format!("{},{}", coord(*x), coord(*y)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn empty(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(r#"<p class="chart-empty">Aucune donnée disponible</p>"#)
}

fn axis_ends(f: &mut fmt::Formatter<'_>, points: &[SeriesPoint]) -> fmt::Result {
    let first = points.first().map(|p| p.label.as_str()).unwrap_or_default();
    let last = points.last().map(|p| p.label.as_str()).unwrap_or_default();
    write!(
        f,
        r#"<div class="chart-axis"><span>{}</span><span>{}</span></div>"#,
        Escaped(first),
        Escaped(last)
    )
}

/// Percentage line chart with a square grid.
pub struct LineChart<'a> {
    pub title: &'a str,
    pub points: &'a [SeriesPoint],
    pub color: &'a str,
}

impl fmt::Display for LineChart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, r#"<div class="chart-card"><h3>{}</h3>"#, Escaped(self.title))?;
        let Some(bounds) = series_bounds(self.points.iter().map(|p| p.value)) else {
            empty(f)?;
            return f.write_str("</div>");
        };
        let positions = positions(self.points, &bounds);

        f.write_str(r#"<svg class="line-chart" viewBox="0 0 100 100" preserveAspectRatio="none">"#)?;
        for step in [0, 25, 50, 75, 100] {
            write!(
                f,
                r#"<line x1="0" y1="{step}" x2="100" y2="{step}" stroke="{GRID_STROKE}" stroke-width="0.5"/>"#
            )?;
        }
        for step in [0, 25, 50, 75, 100] {
            write!(
                f,
                r#"<line x1="{step}" y1="0" x2="{step}" y2="100" stroke="{GRID_STROKE}" stroke-width="0.5"/>"#
            )?;
        }
        write!(
            f,
            r#"<polyline fill="none" stroke="{}" stroke-width="2" points="{}"/>"#,
            Escaped(self.color),
            polyline_points(&positions)
        )?;
        for (point, (x, y)) in self.points.iter().zip(&positions) {
            write!(
                f,
                r#"<circle cx="{}" cy="{}" r="2" fill="{}"><title>{}: {}%</title></circle>"#,
                coord(*x),
                coord(*y),
                Escaped(self.color),
                Escaped(&point.label),
                point.value
            )?;
        }
        f.write_str("</svg>")?;
        axis_ends(f, self.points)?;
        f.write_str("</div>")
    }
}

/// Value-over-time area chart, green when the series ends at or above its
/// start and red otherwise.
pub struct AreaChart<'a> {
    pub points: &'a [SeriesPoint],
    /// Prefix of values in tooltips and axis labels, e.g. `€`
    pub prefix: &'a str,
}

impl AreaChart<'_> {
    const VERTICAL_DIVISIONS: u32 = 6;
    const HORIZONTAL_DIVISIONS: u32 = 4;

    /// Whether the last value is at least the first
    pub fn is_positive(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => last.value >= first.value,
            _ => true,
        }
    }

    /// Change from first to last value in percent, if the first is non-zero
    pub fn change_percent(&self) -> Option<f64> {
        let first = self.points.first()?.value;
        let last = self.points.last()?.value;
        if first == 0.0 {
            None
        } else {
            Some((last - first) / first * 100.0)
        }
    }
}

impl fmt::Display for AreaChart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(bounds) = series_bounds(self.points.iter().map(|p| p.value)) else {
            return empty(f);
        };
        let positive = self.is_positive();
        let (color, gradient) = if positive {
            (POSITIVE, "areaGradient-positive")
        } else {
            (NEGATIVE, "areaGradient-negative")
        };
        let positions = positions(self.points, &bounds);
        let line = polyline_points(&positions);

        f.write_str(r#"<div class="area-chart">"#)?;
        f.write_str(r#"<svg viewBox="0 0 100 100" preserveAspectRatio="none">"#)?;
        write!(
            f,
            r#"<defs><linearGradient id="{gradient}" x1="0%" y1="0%" x2="0%" y2="100%"><stop offset="0%" stop-color="{color}" stop-opacity="0.2"/><stop offset="100%" stop-color="{color}" stop-opacity="0.02"/></linearGradient></defs>"#
        )?;
        for i in 0..=Self::VERTICAL_DIVISIONS {
            let x = coord(f64::from(i) / f64::from(Self::VERTICAL_DIVISIONS) * 100.0);
            write!(
                f,
                r##"<line class="grid-v" x1="{x}" y1="0" x2="{x}" y2="100" stroke="#6B7280" stroke-width="0.2" opacity="0.5"/>"##
            )?;
        }
        for i in 0..=Self::HORIZONTAL_DIVISIONS {
            let y = coord(f64::from(i) / f64::from(Self::HORIZONTAL_DIVISIONS) * 100.0);
            write!(
                f,
                r##"<line class="grid-h" x1="0" y1="{y}" x2="100" y2="{y}" stroke="#6B7280" stroke-width="0.2" opacity="0.5"/>"##
            )?;
        }
        write!(f, r#"<polygon points="0,100 {line} 100,100" fill="url(#{gradient})"/>"#)?;
        write!(
            f,
            r#"<polyline fill="none" stroke="{color}" stroke-width="0.8" points="{line}"/>"#
        )?;
        for (point, (x, y)) in self.points.iter().zip(&positions) {
            write!(
                f,
                r##"<circle cx="{cx}" cy="{cy}" r="0.8" fill="{color}" stroke="#1F2937" stroke-width="0.3"><title>{label}: {prefix}{value}</title></circle>"##,
                cx = coord(*x),
                cy = coord(*y),
                label = Escaped(&point.label),
                prefix = Escaped(self.prefix),
                value = point.value,
            )?;
        }
        f.write_str("</svg>")?;

        f.write_str(r#"<div class="y-labels">"#)?;
        for i in 0..=Self::HORIZONTAL_DIVISIONS {
            let value = bounds.max
                - f64::from(i) / f64::from(Self::HORIZONTAL_DIVISIONS) * bounds.range;
            write!(f, "<span>{}{}</span>", Escaped(self.prefix), value.round())?;
        }
        f.write_str("</div>")?;
        axis_ends(f, self.points)?;
        if let Some(change) = self.change_percent() {
            write!(
                f,
                r#"<div class="trend-badge {}">{}{:.1}%</div>"#,
                if positive { "positive" } else { "negative" },
                if positive { "+" } else { "" },
                change
            )?;
        }
        f.write_str("</div>")
    }
}

/// Vertical bars scaled against the largest value.
pub struct BarChart<'a> {
    pub title: &'a str,
    pub points: &'a [SeriesPoint],
    pub color: &'a str,
}

impl fmt::Display for BarChart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, r#"<div class="chart-card"><h3>{}</h3>"#, Escaped(self.title))?;
        let max = self.points.iter().map(|p| p.value).fold(0.0_f64, f64::max);
        if self.points.is_empty() {
            empty(f)?;
            return f.write_str("</div>");
        }
        let slot = 100.0 / self.points.len() as f64;
        let width = slot * 0.6;

        f.write_str(r#"<svg class="bar-chart" viewBox="0 0 100 100" preserveAspectRatio="none">"#)?;
        for (i, point) in self.points.iter().enumerate() {
            let height = if max > 0.0 {
                (point.value.max(0.0) / max) * 90.0
            } else {
                0.0
            };
            write!(
                f,
                r#"<rect x="{}" y="{}" width="{}" height="{}" rx="1" fill="{}"><title>{}: {}%</title></rect>"#,
                coord(i as f64 * slot + (slot - width) / 2.0),
                coord(100.0 - height),
                coord(width),
                coord(height),
                Escaped(self.color),
                Escaped(&point.label),
                point.value
            )?;
        }
        f.write_str("</svg>")?;
        f.write_str(r#"<div class="bar-labels">"#)?;
        for point in self.points {
            write!(f, "<span>{}</span>", Escaped(&point.label))?;
        }
        f.write_str("</div></div>")
    }
}

/// Allocation donut with its legend.
pub struct DonutChart<'a> {
    pub slices: &'a [AllocationSlice],
}

impl DonutChart<'_> {
    /// Circumference 100 so dash lengths are percentages
    const RADIUS: f64 = 15.915_494_309_189_533;
}

impl fmt::Display for DonutChart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.slices.is_empty() {
            return empty(f);
        }
        f.write_str(r#"<div class="donut-chart"><svg viewBox="0 0 42 42">"#)?;
        write!(
            f,
            r##"<circle cx="21" cy="21" r="{}" fill="transparent" stroke="#F3F4F6" stroke-width="5"/>"##,
            coord(Self::RADIUS)
        )?;
        let mut offset = 25.0;
        for slice in self.slices {
            write!(
                f,
                r#"<circle cx="21" cy="21" r="{}" fill="transparent" stroke="{}" stroke-width="5" stroke-dasharray="{} {}" stroke-dashoffset="{}"><title>{}: {}%</title></circle>"#,
                coord(Self::RADIUS),
                Escaped(&slice.color),
                coord(slice.percentage),
                coord(100.0 - slice.percentage),
                coord(offset),
                Escaped(&slice.name),
                slice.percentage
            )?;
            offset -= slice.percentage;
        }
        f.write_str("</svg><ul class=\"legend\">")?;
        for slice in self.slices {
            write!(
                f,
                r#"<li><span class="swatch" style="background:{}"></span><span class="name">{}</span><span class="pct">{}%</span><span class="amount">{}</span></li>"#,
                Escaped(&slice.color),
                Escaped(&slice.name),
                slice.percentage,
                format_eur(slice.value)
            )?;
        }
        f.write_str("</ul></div>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> Vec<SeriesPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| SeriesPoint::new(format!("M{i}"), *v))
            .collect()
    }

    #[test]
    fn test_coord() {
        assert_eq!(coord(50.0), "50");
        assert_eq!(coord(33.333), "33.33");
        assert_eq!(coord(12.5), "12.5");
        assert_eq!(coord(-0.001), "0");
    }

    #[test]
    fn test_line_chart_grid_and_points() {
        let points = series(&[2.1, 3.2, 1.8]);
        let html = LineChart {
            title: "Performance mensuelle",
            points: &points,
            color: "#3B82F6",
        }
        .to_string();
        assert_eq!(html.matches("<line ").count(), 10);
        assert!(html.contains(r#"points="0,78.57 50,0 100,100""#));
        assert!(html.contains("<title>M0: 2.1%</title>"));
        assert_eq!(html.matches("<circle").count(), 3);
    }

    #[test]
    fn test_line_chart_single_point_is_centered() {
        let points = series(&[4.0]);
        let html = LineChart {
            title: "t",
            points: &points,
            color: "red",
        }
        .to_string();
        assert!(html.contains(r#"<circle cx="50" cy="100""#));
    }

    #[test]
    fn test_line_chart_empty() {
        let html = LineChart {
            title: "t",
            points: &[],
            color: "red",
        }
        .to_string();
        assert!(html.contains("Aucune donnée"));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn test_area_chart_colors() {
        let rising = series(&[100.0, 90.0, 110.0]);
        let chart = AreaChart {
            points: &rising,
            prefix: "€",
        };
        assert!(chart.is_positive());
        let html = chart.to_string();
        assert!(html.contains(POSITIVE));
        assert!(!html.contains(NEGATIVE));
        assert_eq!(html.matches("class=\"grid-v\"").count(), 7);
        assert_eq!(html.matches("class=\"grid-h\"").count(), 5);
        assert!(html.contains("url(#areaGradient-positive)"));
        assert!(html.contains("<span>€110</span>"));
        assert!(html.contains("+10.0%"));

        let falling = series(&[100.0, 80.0]);
        let html = AreaChart {
            points: &falling,
            prefix: "€",
        }
        .to_string();
        assert!(html.contains(NEGATIVE));
        assert!(html.contains("-20.0%"));
    }

    #[test]
    fn test_area_chart_flat_series_counts_as_positive() {
        let flat = series(&[5.0, 5.0]);
        let chart = AreaChart {
            points: &flat,
            prefix: "",
        };
        assert!(chart.is_positive());
        assert_eq!(chart.change_percent(), Some(0.0));
    }

    #[test]
    fn test_bar_chart_scaling() {
        let points = series(&[5.0, 10.0]);
        let html = BarChart {
            title: "Comparaison annuelle",
            points: &points,
            color: "#10B981",
        }
        .to_string();
        assert!(html.contains(r#"y="10" width="30" height="90""#));
        assert!(html.contains(r#"y="55" width="30" height="45""#));
    }

    #[test]
    fn test_donut_offsets() {
        let slices = vec![
            AllocationSlice {
                name: "Actions".into(),
                percentage: 60.0,
                value: 600.0,
                color: "#3B82F6".into(),
            },
            AllocationSlice {
                name: "Taux".into(),
                percentage: 40.0,
                value: 400.0,
                color: "#10B981".into(),
            },
        ];
        let html = DonutChart { slices: &slices }.to_string();
        assert!(html.contains(r#"stroke-dasharray="60 40" stroke-dashoffset="25""#));
        assert!(html.contains(r#"stroke-dasharray="40 60" stroke-dashoffset="-35""#));
        assert!(html.contains("<title>Actions: 60%</title>"));
    }
}
