//! Performance series and risk figures displayed on the stats page.

use serde::{Deserialize, Serialize};

/// Labelled value of a chart series (percent for performance series).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// X-axis label
    pub label: String,
    /// Y value
    pub value: f64,
}

impl SeriesPoint {
    /// Create a new point
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Slice of the asset allocation donut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct AllocationSlice {
    pub name: String,
    pub percentage: f64,
    pub value: f64,
    /// CSS colour, e.g. `#3B82F6`
    pub color: String,
}

/// Direction of a risk metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

impl Trend {
    /// Arrow glyph
    pub fn arrow(&self) -> &'static str {
        match self {
            Trend::Up => "↑",
            Trend::Down => "↓",
            Trend::Neutral => "→",
        }
    }

    /// CSS modifier
    pub fn css_class(&self) -> &'static str {
        match self {
            Trend::Up => "trend-up",
            Trend::Down => "trend-down",
            Trend::Neutral => "trend-neutral",
        }
    }
}

/// Risk indicator card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct RiskMetric {
    pub label: String,
    /// Preformatted value
    pub value: String,
    pub trend: Trend,
    pub description: String,
}

/// Vertical bounds of a series used to scale charts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesBounds {
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
    /// `max - min`, or `1.0` for a flat series
    pub range: f64,
}

impl SeriesBounds {
    /// Position of `value` as a 0..=100 ratio from the top (SVG y grows downwards).
    pub fn y_percent(&self, value: f64) -> f64 {
        100.0 - (value - self.min) / self.range * 100.0
    }
}

/// Compute bounds over `values`; `None` when empty.
///
/// # Examples
/// ```
/// use portal_core::stats::series_bounds;
///
/// let b = series_bounds([2.0, 5.0, 3.0]).unwrap();
/// assert_eq!((b.min, b.max, b.range), (2.0, 5.0, 3.0));
///
/// let flat = series_bounds([4.0, 4.0]).unwrap();
/// assert_eq!(flat.range, 1.0);
/// ```
pub fn series_bounds<I>(values: I) -> Option<SeriesBounds>
where
    I: IntoIterator<Item = f64>,
{
    let mut iter = values.into_iter();
    let first = iter.next()?;
    let (min, max) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let range = if max - min == 0.0 { 1.0 } else { max - min };
    Some(SeriesBounds { min, max, range })
}

/// Horizontal position of point `index` out of `len`, in 0..=100.
///
/// A single point sits in the middle.
pub fn x_percent(index: usize, len: usize) -> f64 {
    if len <= 1 {
        50.0
    } else {
        index as f64 / (len - 1) as f64 * 100.0
    }
}
