//! Filter stage: derive an order-preserving subset of a dataset from the active selections.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel label that passes every record.
pub const ALL: &str = "All";

/// The value picked for one filter dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Choice {
    #[default]
    All,
    Only(String),
}

impl Choice {
    /// `"All"` (any case) becomes [`Choice::All`], everything else an exact value.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.eq_ignore_ascii_case(ALL) {
            Choice::All
        } else {
            Choice::Only(s.to_string())
        }
    }

    pub fn only(value: impl Into<String>) -> Self {
        Choice::Only(value.into())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Choice::All => ALL,
            Choice::Only(v) => v,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One dimension's active choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub dimension: String,
    pub value: Choice,
}

/// Active choices for every dimension of one chart. Absent dimensions read as "All".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSet {
    entries: Vec<Selection>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, dimension: &str) -> &Choice {
        static ALL_CHOICE: Choice = Choice::All;
        self.entries
            .iter()
            .find(|s| s.dimension == dimension)
            .map(|s| &s.value)
            .unwrap_or(&ALL_CHOICE)
    }

    /// Set a dimension's choice. Returns `true` when the stored value changed.
    pub fn set(&mut self, dimension: &str, value: Choice) -> bool {
        match self.entries.iter_mut().find(|s| s.dimension == dimension) {
            Some(entry) if entry.value == value => false,
            Some(entry) => {
                entry.value = value;
                true
            }
            None if value.is_all() => false,
            None => {
                self.entries.push(Selection {
                    dimension: dimension.to_string(),
                    value,
                });
                true
            }
        }
    }

    /// Builder-style [`SelectionSet::set`].
    pub fn with(mut self, dimension: &str, value: Choice) -> Self {
        self.set(dimension, value);
        self
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Selection> {
        self.entries.iter()
    }
}

/// What a dimension narrows.
pub enum Target<R> {
    /// Keep only records for which the matcher accepts the chosen value.
    Records(fn(&R, &str) -> bool),
    /// Keep every record but narrow the visible series to the one named by the choice.
    Series,
}

impl<R> Clone for Target<R> {
    fn clone(&self) -> Self {
        match self {
            Target::Records(m) => Target::Records(*m),
            Target::Series => Target::Series,
        }
    }
}

/// A categorical parameter the user can filter a chart by.
pub struct FilterDimension<R> {
    /// Key used in selections, e.g. `"year"`.
    pub name: &'static str,
    /// Label of the "All" entry, e.g. `"All Years"`.
    pub all_label: &'static str,
    /// Valid discrete values, in display order (without the "All" sentinel).
    pub options: Vec<String>,
    pub target: Target<R>,
}

impl<R> Clone for FilterDimension<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            all_label: self.all_label,
            options: self.options.clone(),
            target: self.target.clone(),
        }
    }
}

impl<R> FilterDimension<R> {
    pub fn records(
        name: &'static str,
        all_label: &'static str,
        options: Vec<String>,
        matches: fn(&R, &str) -> bool,
    ) -> Self {
        Self {
            name,
            all_label,
            options,
            target: Target::Records(matches),
        }
    }

    pub fn series(name: &'static str, all_label: &'static str, options: Vec<String>) -> Self {
        Self {
            name,
            all_label,
            options,
            target: Target::Series,
        }
    }

    /// Does `record` survive this dimension under `choice`?
    pub fn admits(&self, record: &R, choice: &Choice) -> bool {
        match (choice, &self.target) {
            (Choice::All, _) | (_, Target::Series) => true,
            (Choice::Only(value), Target::Records(matches)) => matches(record, value),
        }
    }
}

/// Keep the records admitted by every dimension, in input order.
///
/// Returns references into the input, so the result is a subset by identity.
/// An empty result is a valid outcome.
pub fn filter<'a, R, I>(
    dataset: I,
    dimensions: &[FilterDimension<R>],
    selection: &SelectionSet,
) -> Vec<&'a R>
where
    I: IntoIterator<Item = &'a R>,
    R: 'a,
{
    dataset
        .into_iter()
        .filter(|record| {
            dimensions
                .iter()
                .all(|d| d.admits(record, selection.get(d.name)))
        })
        .collect()
}
