use serde::{Deserialize, Serialize};
use std::fmt;

/// `(min, max)` of the finite values, or `None` when there are none.
pub fn extent<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

pub fn max<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    extent(values).map(|(_, hi)| hi)
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Summary statistics for one measure of a filtered subset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub measure: String,
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Count, extent, mean and median of `values`. Non-finite values are ignored.
pub fn summarize(measure: &str, values: &[f64]) -> Summary {
    let mut vals: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    vals.sort_by(|a, b| a.total_cmp(b));
    let count = vals.len();
    let median = if count == 0 {
        None
    } else if count % 2 == 1 {
        Some(vals[count / 2])
    } else {
        Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
    };
    Summary {
        measure: measure.to_string(),
        count,
        min: vals.first().copied(),
        max: vals.last().copied(),
        mean: mean(&vals),
        median,
    }
}

/// Direction of a fitted trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Correlation {
    Positive,
    Negative,
}

impl fmt::Display for Correlation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Correlation::Positive => f.write_str("Positive correlation"),
            Correlation::Negative => f.write_str("Negative correlation"),
        }
    }
}

/// Ordinary least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub slope: f64,
    pub intercept: f64,
    pub n: usize,
}

impl Trend {
    /// Fit over `(x, y)` pairs. Zero variance in `x` yields slope 0; an empty input yields `None`.
    pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f64;
        let x_mean = points.iter().map(|p| p.0).sum::<f64>() / n;
        let y_mean = points.iter().map(|p| p.1).sum::<f64>() / n;
        let (num, den) = points.iter().fold((0.0, 0.0), |(num, den), (x, y)| {
            let dx = x - x_mean;
            (num + dx * (y - y_mean), den + dx * dx)
        });
        let slope = if den != 0.0 { num / den } else { 0.0 };
        Some(Self {
            slope,
            intercept: y_mean - slope * x_mean,
            n: points.len(),
        })
    }

    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// A flat fit counts as positive.
    pub fn correlation(&self) -> Correlation {
        if self.slope >= 0.0 {
            Correlation::Positive
        } else {
            Correlation::Negative
        }
    }
}
