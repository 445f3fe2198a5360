use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Canonical calendar order used for month bands and month colors.
pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Full month names offered by month selectors.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Position of a 3-letter month abbreviation in [`MONTHS`].
pub fn month_index(abbr: &str) -> Option<usize> {
    MONTHS.iter().position(|m| *m == abbr)
}

/// Map a full month name ("January") to its abbreviation ("Jan") by prefix.
pub fn month_abbr(name: &str) -> Option<&'static str> {
    let prefix: String = name.trim().chars().take(3).collect();
    MONTHS.iter().copied().find(|m| *m == prefix)
}

/// Calendar month of a "Mon YYYY" label such as `"Jan 2022"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    /// Zero-based month (0 = January).
    pub month0: u32,
}

impl Period {
    /// Parse `"Jan 2022"`. Returns `None` for anything chrono cannot read as a month and year.
    pub fn parse(label: &str) -> Option<Self> {
        let date = NaiveDate::parse_from_str(&format!("1 {}", label.trim()), "%d %b %Y").ok()?;
        Some(Self {
            year: date.year(),
            month0: date.month0(),
        })
    }

    pub fn month_abbr(&self) -> &'static str {
        MONTHS[self.month0 as usize % MONTHS.len()]
    }
}

/// Split a period label into its (month, year) words without interpreting them.
///
/// Falls back to the whole label as the month and an empty year.
pub fn split_period(label: &str) -> (&str, &str) {
    label.split_once(' ').unwrap_or((label, ""))
}

/// One time-series observation (monthly mean temperature).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// "Jan 2022"
    pub period: String,
    pub metric: f64,
}

impl TimeSeriesPoint {
    pub fn new(period: &str, metric: f64) -> Self {
        Self {
            period: period.to_string(),
            metric,
        }
    }

    /// Calendar month and year of [`Self::period`], `None` when it does not parse.
    pub fn parsed(&self) -> Option<Period> {
        Period::parse(&self.period)
    }

    /// Canonical month abbreviation, or the label's first word when the period does not parse.
    pub fn month(&self) -> &str {
        match self.parsed() {
            Some(p) => p.month_abbr(),
            None => split_period(&self.period).0,
        }
    }

    pub fn year(&self) -> &str {
        split_period(&self.period).1
    }
}

/// Physiographic regions of the rainfall series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Mountain,
    Hill,
    Terai,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Mountain, Region::Hill, Region::Terai];

    pub fn name(&self) -> &'static str {
        match self {
            Region::Mountain => "Mountain",
            Region::Hill => "Hill",
            Region::Terai => "Terai",
        }
    }
}

/// Multi-series observation keyed by region. Zero means "no observation".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionObservation {
    pub period: String,
    #[serde(rename = "Mountain")]
    pub mountain: f64,
    #[serde(rename = "Hill")]
    pub hill: f64,
    #[serde(rename = "Terai")]
    pub terai: f64,
}

impl RegionObservation {
    pub fn new(period: &str, mountain: f64, hill: f64, terai: f64) -> Self {
        Self {
            period: period.to_string(),
            mountain,
            hill,
            terai,
        }
    }

    /// Calendar month and year of [`Self::period`], `None` when it does not parse.
    pub fn parsed(&self) -> Option<Period> {
        Period::parse(&self.period)
    }

    /// Canonical month abbreviation, or the label's first word when the period does not parse.
    pub fn month(&self) -> &str {
        match self.parsed() {
            Some(p) => p.month_abbr(),
            None => split_period(&self.period).0,
        }
    }

    pub fn year(&self) -> &str {
        split_period(&self.period).1
    }
}

/// Independent temperature/humidity sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterObservation {
    pub temperature: f64,
    pub humidity: f64,
    /// 3-letter month abbreviation.
    pub month: String,
    pub year: i32,
}

impl ScatterObservation {
    pub fn new(temperature: f64, humidity: f64, month: &str, year: i32) -> Self {
        Self {
            temperature,
            humidity,
            month: month.to_string(),
            year,
        }
    }
}

/// Particle load and humidity measured at one named site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteMetric {
    pub name: String,
    /// µg/m³
    pub fine_particles: f64,
    /// µg/m³
    pub coarse_particles: f64,
    /// %
    pub humidity: f64,
}

impl SiteMetric {
    pub fn new(name: &str, fine_particles: f64, coarse_particles: f64, humidity: f64) -> Self {
        Self {
            name: name.to_string(),
            fine_particles,
            coarse_particles,
            humidity,
        }
    }
}

/// Pixel size of a rendering surface. Height is fixed per chart, width tracks the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}
