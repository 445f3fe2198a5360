//! Data source: the four immutable collections the charts draw from.
//!
//! The dashboard never writes back to its data. A [`DataSource`] hands out a
//! [`Dataset`] once; every redraw derives its view from that bundle.

use crate::error::DashboardError;
use crate::models::{
    Period, RegionObservation, ScatterObservation, SiteMetric, TimeSeriesPoint, month_index,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// All collections the dashboard renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Monthly temperature (line chart).
    pub temperature: Vec<TimeSeriesPoint>,
    /// Monthly rainfall per region (grouped bars).
    pub rainfall: Vec<RegionObservation>,
    /// Temperature vs humidity samples (scatter).
    pub climate: Vec<ScatterObservation>,
    /// Particle load per site (stacked bars + humidity overlay).
    pub pollution: Vec<SiteMetric>,
}

impl Dataset {
    /// Check that every period label parses and every scatter month is a known abbreviation.
    pub fn validate(&self) -> Result<(), DashboardError> {
        let periods = self
            .temperature
            .iter()
            .map(|r| ("temperature", r.period.as_str()))
            .chain(self.rainfall.iter().map(|r| ("rainfall", r.period.as_str())));
        for (collection, label) in periods {
            if Period::parse(label).is_none() {
                return Err(DashboardError::InvalidPeriod {
                    collection,
                    label: label.to_string(),
                });
            }
        }
        if let Some(bad) = self.climate.iter().find(|r| month_index(&r.month).is_none()) {
            return Err(DashboardError::InvalidPeriod {
                collection: "climate",
                label: format!("{} {}", bad.month, bad.year),
            });
        }
        Ok(())
    }
}

/// Read-only supplier of a [`Dataset`].
pub trait DataSource {
    fn dataset(&self) -> Result<Dataset>;
}

/// The sample literals bundled with the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleData;

impl DataSource for SampleData {
    fn dataset(&self) -> Result<Dataset> {
        let dataset = sample();
        dataset.validate()?;
        Ok(dataset)
    }
}

const TEMPERATURE: [(&str, f64); 24] = [
    ("Jan 2022", 9.5),
    ("Feb 2022", 11.8),
    ("Mar 2022", 16.2),
    ("Apr 2022", 19.7),
    ("May 2022", 22.5),
    ("Jun 2022", 24.8),
    ("Jul 2022", 25.3),
    ("Aug 2022", 25.1),
    ("Sep 2022", 23.9),
    ("Oct 2022", 19.8),
    ("Nov 2022", 15.2),
    ("Dec 2022", 11.0),
    ("Jan 2023", 8.9),
    ("Feb 2023", 12.3),
    ("Mar 2023", 16.9),
    ("Apr 2023", 20.4),
    ("May 2023", 23.1),
    ("Jun 2023", 25.2),
    ("Jul 2023", 25.8),
    ("Aug 2023", 25.4),
    ("Sep 2023", 24.2),
    ("Oct 2023", 20.3),
    ("Nov 2023", 15.7),
    ("Dec 2023", 10.5),
];

const CLIMATE: [(f64, f64, &str, i32); 24] = [
    (9.5, 65.0, "Jan", 2022),
    (11.8, 60.0, "Feb", 2022),
    (16.2, 55.0, "Mar", 2022),
    (19.7, 58.0, "Apr", 2022),
    (22.5, 65.0, "May", 2022),
    (24.8, 78.0, "Jun", 2022),
    (25.3, 85.0, "Jul", 2022),
    (25.1, 87.0, "Aug", 2022),
    (23.9, 80.0, "Sep", 2022),
    (19.8, 70.0, "Oct", 2022),
    (15.2, 65.0, "Nov", 2022),
    (11.0, 68.0, "Dec", 2022),
    (8.9, 63.0, "Jan", 2023),
    (12.3, 58.0, "Feb", 2023),
    (16.9, 52.0, "Mar", 2023),
    (20.4, 56.0, "Apr", 2023),
    (23.1, 63.0, "May", 2023),
    (25.2, 80.0, "Jun", 2023),
    (25.8, 88.0, "Jul", 2023),
    (25.4, 90.0, "Aug", 2023),
    (24.2, 82.0, "Sep", 2023),
    (20.3, 68.0, "Oct", 2023),
    (15.7, 62.0, "Nov", 2023),
    (10.5, 65.0, "Dec", 2023),
];

// (period, Mountain, Hill, Terai)
const RAINFALL: [(&str, f64, f64, f64); 24] = [
    ("Jan 2022", 14.2, 0.0, 0.0),
    ("Feb 2022", 18.5, 0.0, 0.0),
    ("Mar 2022", 25.7, 0.0, 0.0),
    ("Apr 2022", 0.0, 48.3, 0.0),
    ("May 2022", 0.0, 96.4, 0.0),
    ("Jun 2022", 0.0, 0.0, 185.6),
    ("Jul 2022", 0.0, 0.0, 325.8),
    ("Aug 2022", 0.0, 0.0, 298.7),
    ("Sep 2022", 0.0, 170.5, 0.0),
    ("Oct 2022", 0.0, 53.2, 0.0),
    ("Nov 2022", 8.5, 0.0, 0.0),
    ("Dec 2022", 10.1, 0.0, 0.0),
    ("Jan 2023", 12.7, 0.0, 0.0),
    ("Feb 2023", 20.1, 0.0, 0.0),
    ("Mar 2023", 0.0, 28.3, 0.0),
    ("Apr 2023", 0.0, 52.8, 0.0),
    ("May 2023", 0.0, 103.5, 0.0),
    ("Jun 2023", 0.0, 0.0, 195.2),
    ("Jul 2023", 0.0, 0.0, 342.1),
    ("Aug 2023", 0.0, 0.0, 312.4),
    ("Sep 2023", 0.0, 184.9, 0.0),
    ("Oct 2023", 0.0, 58.7, 0.0),
    ("Nov 2023", 9.2, 0.0, 0.0),
    ("Dec 2023", 8.9, 0.0, 0.0),
];

// (site, fine µg/m³, coarse µg/m³, humidity %)
const POLLUTION: [(&str, f64, f64, f64); 3] = [
    ("Kathmandu", 154.0, 299.2, 42.0),
    ("Bhaktapur", 178.4, 338.1, 37.0),
    ("Lalitpur", 154.9, 205.7, 9.0),
];

/// Build the bundled sample [`Dataset`].
pub fn sample() -> Dataset {
    Dataset {
        temperature: TEMPERATURE
            .iter()
            .map(|(p, t)| TimeSeriesPoint::new(p, *t))
            .collect(),
        rainfall: RAINFALL
            .iter()
            .map(|(p, m, h, t)| RegionObservation::new(p, *m, *h, *t))
            .collect(),
        climate: CLIMATE
            .iter()
            .map(|(t, h, m, y)| ScatterObservation::new(*t, *h, m, *y))
            .collect(),
        pollution: POLLUTION
            .iter()
            .map(|(n, f, c, h)| SiteMetric::new(n, *f, *c, *h))
            .collect(),
    }
}
