//! Selection controls: the discrete choices a user can make per chart.

use crate::error::DashboardError;
use crate::filter::{Choice, FilterDimension, SelectionSet};

/// Display description of one dimension: its key, "All" label, and valid values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionOptions {
    pub name: &'static str,
    pub all_label: &'static str,
    pub options: Vec<String>,
}

impl DimensionOptions {
    /// Every valid choice, starting with the "All" sentinel.
    pub fn choices(&self) -> Vec<Choice> {
        std::iter::once(Choice::All)
            .chain(self.options.iter().cloned().map(Choice::Only))
            .collect()
    }

    /// Text shown for a choice ("All Years" for the sentinel).
    pub fn label<'a>(&'a self, choice: &'a Choice) -> &'a str {
        match choice {
            Choice::All => self.all_label,
            Choice::Only(v) => v,
        }
    }

    pub fn offers(&self, choice: &Choice) -> bool {
        match choice {
            Choice::All => true,
            Choice::Only(v) => self.options.iter().any(|o| o == v),
        }
    }
}

/// Active selections for one chart plus a revision that bumps on every change.
#[derive(Debug, Clone)]
pub struct SelectionControls {
    chart: &'static str,
    dimensions: Vec<DimensionOptions>,
    selection: SelectionSet,
    revision: u64,
}

impl SelectionControls {
    pub fn new(chart: &'static str, dimensions: Vec<DimensionOptions>) -> Self {
        Self {
            chart,
            dimensions,
            selection: SelectionSet::new(),
            revision: 0,
        }
    }

    pub fn from_dimensions<R>(chart: &'static str, dimensions: &[FilterDimension<R>]) -> Self {
        Self::new(
            chart,
            dimensions
                .iter()
                .map(|d| DimensionOptions {
                    name: d.name,
                    all_label: d.all_label,
                    options: d.options.clone(),
                })
                .collect(),
        )
    }

    pub fn dimensions(&self) -> &[DimensionOptions] {
        &self.dimensions
    }

    pub fn dimension(&self, name: &str) -> Option<&DimensionOptions> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn current(&self, dimension: &str) -> &Choice {
        self.selection.get(dimension)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Apply a user choice. Returns `Ok(true)` when the selection changed (and the chart must redraw).
    pub fn choose(&mut self, dimension: &str, choice: Choice) -> Result<bool, DashboardError> {
        let dim = self
            .dimension(dimension)
            .ok_or_else(|| DashboardError::UnknownDimension {
                chart: self.chart.to_string(),
                dimension: dimension.to_string(),
            })?;
        if !dim.offers(&choice) {
            return Err(DashboardError::InvalidChoice {
                dimension: dimension.to_string(),
                value: choice.to_string(),
                expected: dim.options.join(", "),
            });
        }
        let changed = self.selection.set(dimension, choice);
        if changed {
            self.revision += 1;
            log::debug!("{}: {} -> {}", self.chart, dimension, self.selection.get(dimension));
        }
        Ok(changed)
    }

    /// Restore every dimension to "All". Always counts as an invalidation.
    pub fn reset(&mut self) {
        self.selection.clear();
        self.revision += 1;
        log::debug!("{}: selections reset", self.chart);
    }
}
