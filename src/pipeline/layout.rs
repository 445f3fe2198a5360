//! Layout/scale stage: positional and color mappings for one subset at one size.

use super::config::{ChartConfig, Encoding, first_seen};
use crate::color::{ColorScale, NEUTRAL, Rgb};
use crate::filter::{Choice, SelectionSet};
use crate::models::Dimensions;
use crate::scale::{BandScale, LinearScale};
use crate::viz::types::PlotArea;
use ahash::AHashMap;

/// Color key of the ordinal scale for line series and scatter categories.
pub const SERIES_KEY: &str = "series";

#[derive(Debug, Clone, PartialEq)]
pub enum XScale {
    Band(BandScale),
    Linear(LinearScale),
}

/// Output of [`compute_scales`].
#[derive(Debug, Clone)]
pub struct Scales {
    pub plot: PlotArea,
    pub x: XScale,
    /// Sub-group bands inside each category band (grouped bars).
    pub inner: Option<BandScale>,
    pub y: LinearScale,
    /// Secondary axis (stacked overlay).
    pub y2: Option<LinearScale>,
    pub colors: AHashMap<String, ColorScale>,
}

impl Scales {
    pub fn band(&self) -> Option<&BandScale> {
        match &self.x {
            XScale::Band(b) => Some(b),
            XScale::Linear(_) => None,
        }
    }

    pub fn linear_x(&self) -> Option<&LinearScale> {
        match &self.x {
            XScale::Linear(l) => Some(l),
            XScale::Band(_) => None,
        }
    }

    /// Color for `key`; unknown keys fall back to the neutral grey.
    pub fn color(&self, key: &str, category: &str, value: f64) -> Rgb {
        self.colors
            .get(key)
            .map(|c| c.color(category, value))
            .unwrap_or(NEUTRAL)
    }
}

/// Map the subset onto a surface of `dims`. Never fails: empty subsets get fallback domains.
pub fn compute_scales<R>(
    config: &ChartConfig<R>,
    subset: &[&R],
    selection: &SelectionSet,
    dims: Dimensions,
) -> Scales {
    let plot = PlotArea::inset(dims.width as f64, dims.height as f64, &config.margin);
    let x_range = (plot.left, plot.right());
    let y_range = (plot.bottom(), plot.top);
    let mut colors = AHashMap::new();

    match &config.encoding {
        Encoding::GroupedBars {
            category,
            order,
            group_dimension,
            y,
            padding,
            ..
        } => {
            let band = BandScale::new(
                order.domain(subset.iter().map(|r| category(r))),
                x_range,
                *padding,
            );
            let groups = match selection.get(group_dimension) {
                Choice::All => config
                    .dimension(group_dimension)
                    .map(|d| d.options.clone())
                    .unwrap_or_default(),
                Choice::Only(v) => vec![v.clone()],
            };
            let inner = BandScale::new(groups, (0.0, band.bandwidth()), 0.0);
            let visible = config.encoding.visible_measures(selection);
            let y = y.resolve(
                subset
                    .iter()
                    .flat_map(|r| visible.iter().map(move |m| m.of(r))),
            );
            for m in &visible {
                let values: Vec<f64> = subset.iter().map(|r| m.of(r)).collect();
                colors.insert(
                    m.name.to_string(),
                    ColorScale::resolve(&m.color, Vec::new(), &values),
                );
            }
            Scales {
                plot,
                x: XScale::Band(band),
                inner: Some(inner),
                y: LinearScale::new(y, y_range),
                y2: None,
                colors,
            }
        }
        Encoding::Lines {
            category,
            order,
            series,
            value,
            y,
            padding,
            ..
        } => {
            let band = BandScale::new(
                order.domain(subset.iter().map(|r| category(r))),
                x_range,
                *padding,
            );
            let y = y.resolve(subset.iter().map(|r| value.of(r)));
            let keys = first_seen(subset.iter().map(|r| series(r)));
            colors.insert(
                SERIES_KEY.to_string(),
                ColorScale::resolve(&value.color, keys, &[]),
            );
            Scales {
                plot,
                x: XScale::Band(band),
                inner: None,
                y: LinearScale::new(y, y_range),
                y2: None,
                colors,
            }
        }
        Encoding::Scatter {
            x,
            y,
            color_key,
            color_order,
            color,
            x_domain,
            y_domain,
            ..
        } => {
            let xd = x_domain.resolve(subset.iter().map(|r| x.of(r)));
            let yd = y_domain.resolve(subset.iter().map(|r| y.of(r)));
            let categories = color_order.domain(subset.iter().map(|r| color_key(r)));
            colors.insert(
                SERIES_KEY.to_string(),
                ColorScale::resolve(color, categories, &[]),
            );
            Scales {
                plot,
                x: XScale::Linear(LinearScale::new(xd, x_range)),
                inner: None,
                y: LinearScale::new(yd, y_range),
                y2: None,
                colors,
            }
        }
        Encoding::Stacked {
            category,
            segments,
            overlay,
            y,
            y2,
            padding,
            ..
        } => {
            let band = BandScale::new(
                first_seen(subset.iter().map(|r| category(r))),
                x_range,
                *padding,
            );
            let y = y.resolve(
                subset
                    .iter()
                    .map(|r| segments.iter().map(|m| m.of(r)).sum::<f64>()),
            );
            let y2 = y2.resolve(subset.iter().map(|r| overlay.of(r)));
            for m in segments.iter().chain(std::iter::once(overlay)) {
                let values: Vec<f64> = subset.iter().map(|r| m.of(r)).collect();
                colors.insert(
                    m.name.to_string(),
                    ColorScale::resolve(&m.color, Vec::new(), &values),
                );
            }
            Scales {
                plot,
                x: XScale::Band(band),
                inner: None,
                y: LinearScale::new(y, y_range),
                y2: Some(LinearScale::new(y2, y_range)),
                colors,
            }
        }
    }
}
