use thiserror::Error;

/// Domain failures a caller may want to match on.
///
/// Pure stages (filter, scales, scene building) never produce these; they are
/// raised at the edges where user input or file names enter the crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    #[error("chart `{chart}` has no filter dimension named `{dimension}`")]
    UnknownDimension { chart: String, dimension: String },

    #[error("`{value}` is not a valid choice for `{dimension}` (expected one of: {expected})")]
    InvalidChoice {
        dimension: String,
        value: String,
        expected: String,
    },

    #[error("unknown chart `{0}` (expected rainfall, temperature, climate or pollution)")]
    UnknownChart(String),

    #[error("unsupported output format `{0}` (expected svg or png)")]
    UnsupportedImageFormat(String),

    #[error("unsupported export format `{0}` (expected csv or json)")]
    UnsupportedExportFormat(String),

    #[error("invalid selection `{0}`, expected dimension=value")]
    MalformedSelection(String),

    #[error("{collection}: `{label}` is not a month label (expected e.g. \"Jan 2022\")")]
    InvalidPeriod {
        collection: &'static str,
        label: String,
    },
}
