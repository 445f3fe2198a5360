//! Declarative chart configuration: field selectors, color policies and a variant tag.

use crate::color::ColorPolicy;
use crate::filter::{Choice, FilterDimension, SelectionSet};
use crate::scale::DomainPolicy;
use crate::viz::types::{LegendLayout, Margin};

/// A numeric field of `R` and how to present it.
pub struct Measure<R> {
    /// Key used for colors and series-dimension matching ("Mountain", "fine").
    pub name: &'static str,
    /// Legend and tooltip label ("Fine Particles").
    pub label: &'static str,
    /// Suffix appended to values, including any leading space (" mm", "°C").
    pub unit: &'static str,
    pub value: fn(&R) -> f64,
    pub color: ColorPolicy,
    /// Where a gradient is sampled for the legend swatch.
    pub legend_value: Option<f64>,
}

impl<R> Clone for Measure<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            label: self.label,
            unit: self.unit,
            value: self.value,
            color: self.color,
            legend_value: self.legend_value,
        }
    }
}

impl<R> Measure<R> {
    pub fn new(
        name: &'static str,
        label: &'static str,
        unit: &'static str,
        value: fn(&R) -> f64,
        color: ColorPolicy,
    ) -> Self {
        Self {
            name,
            label,
            unit,
            value,
            color,
            legend_value: None,
        }
    }

    pub fn legend_at(mut self, value: f64) -> Self {
        self.legend_value = Some(value);
        self
    }

    pub fn of(&self, record: &R) -> f64 {
        (self.value)(record)
    }
}

/// Order of the bands on a categorical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryOrder {
    /// Distinct values in the order they first appear in the subset.
    FirstSeen,
    /// Always this full list, whether or not the subset has data for every entry.
    Canonical(&'static [&'static str]),
}

impl CategoryOrder {
    pub fn domain<'a, I: IntoIterator<Item = &'a str>>(&self, seen: I) -> Vec<String> {
        match self {
            CategoryOrder::FirstSeen => first_seen(seen),
            CategoryOrder::Canonical(list) => list.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Sort key of a category; unknown categories sort last.
    pub fn rank(&self, category: &str) -> usize {
        match self {
            CategoryOrder::FirstSeen => 0,
            CategoryOrder::Canonical(list) => {
                list.iter().position(|c| *c == category).unwrap_or(list.len())
            }
        }
    }
}

/// Distinct values in first-seen order.
pub fn first_seen<'a, I: IntoIterator<Item = &'a str>>(values: I) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values {
        if !out.iter().any(|o| o == v) {
            out.push(v.to_string());
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisTitles {
    pub x: Option<&'static str>,
    pub y: &'static str,
    pub y2: Option<&'static str>,
    pub size: u32,
}

/// Bold captions naming each value of a dimension while it is set to "All".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptionSpec {
    pub dimension: &'static str,
    /// Skip values the subset has no records for.
    pub require_data: bool,
    pub fade_in: bool,
}

/// Variant tag plus the field selectors each visual style needs.
pub enum Encoding<R> {
    /// Bars grouped by `category`, sub-grouped by `group`, one bar per visible measure.
    GroupedBars {
        category: fn(&R) -> &str,
        order: CategoryOrder,
        group: fn(&R) -> &str,
        /// Dimension whose options form the sub-groups.
        group_dimension: &'static str,
        /// Series dimension that narrows `measures` by name.
        series_dimension: &'static str,
        measures: Vec<Measure<R>>,
        y: DomainPolicy,
        padding: f64,
    },
    /// One monotone line per `series`, through the band centres of `category`.
    Lines {
        category: fn(&R) -> &str,
        order: CategoryOrder,
        series: fn(&R) -> &str,
        value: Measure<R>,
        y: DomainPolicy,
        padding: f64,
        grid: bool,
    },
    /// One point per record, colored by `color_key`, with an optional least-squares trend.
    Scatter {
        x: Measure<R>,
        y: Measure<R>,
        color_key: fn(&R) -> &str,
        color_order: CategoryOrder,
        color: ColorPolicy,
        /// First tooltip line ("Jan 2022").
        title: fn(&R) -> String,
        group: fn(&R) -> String,
        x_domain: DomainPolicy,
        y_domain: DomainPolicy,
        trend: bool,
    },
    /// Segments stacked per `category` on the primary axis, `overlay` on a secondary axis.
    Stacked {
        category: fn(&R) -> &str,
        segments: Vec<Measure<R>>,
        overlay: Measure<R>,
        y: DomainPolicy,
        y2: DomainPolicy,
        padding: f64,
        ticks: usize,
    },
}

impl<R> Encoding<R> {
    /// Measures drawn under `selection`.
    pub fn visible_measures(&self, selection: &SelectionSet) -> Vec<&Measure<R>> {
        match self {
            Encoding::GroupedBars {
                series_dimension,
                measures,
                ..
            } => match selection.get(series_dimension) {
                Choice::All => measures.iter().collect(),
                Choice::Only(name) => measures.iter().filter(|m| m.name == name.as_str()).collect(),
            },
            Encoding::Lines { value, .. } => vec![value],
            Encoding::Scatter { x, y, .. } => vec![x, y],
            Encoding::Stacked {
                segments, overlay, ..
            } => segments.iter().chain(std::iter::once(overlay)).collect(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Encoding::GroupedBars { .. } => "grouped bars",
            Encoding::Lines { .. } => "lines",
            Encoding::Scatter { .. } => "scatter",
            Encoding::Stacked { .. } => "stacked bars",
        }
    }
}

/// Everything that distinguishes one chart from another.
pub struct ChartConfig<R> {
    pub name: &'static str,
    pub title: &'static str,
    /// Fixed surface height in pixels.
    pub height: u32,
    pub margin: Margin,
    pub titles: AxisTitles,
    pub dimensions: Vec<FilterDimension<R>>,
    pub captions: Option<CaptionSpec>,
    pub legend: LegendLayout,
    pub encoding: Encoding<R>,
}

impl<R> ChartConfig<R> {
    pub fn dimension(&self, name: &str) -> Option<&FilterDimension<R>> {
        self.dimensions.iter().find(|d| d.name == name)
    }
}
