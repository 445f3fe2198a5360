//! The four dashboard charts as thin configurations over [`ChartPipeline`].

use crate::color::{CATEGORY10, ColorPolicy, GradientDomain, NEUTRAL, Rgb, SERIES_PAIR};
use crate::data::Dataset;
use crate::error::DashboardError;
use crate::filter::FilterDimension;
use crate::models::{
    MONTH_NAMES, MONTHS, Period, Region, RegionObservation, ScatterObservation, SiteMetric,
    TimeSeriesPoint, month_abbr,
};
use crate::pipeline::{
    AxisTitles, CaptionSpec, CategoryOrder, Chart, ChartConfig, ChartPipeline, Encoding, Measure,
    first_seen,
};
use crate::scale::DomainPolicy;
use crate::viz::types::{LegendLayout, Margin};

pub const RAINFALL: &str = "rainfall";
pub const TEMPERATURE: &str = "temperature";
pub const CLIMATE: &str = "climate";
pub const POLLUTION: &str = "pollution";

/// Chart names in dashboard order.
pub const CHART_NAMES: [&str; 4] = [RAINFALL, TEMPERATURE, CLIMATE, POLLUTION];

const CHART_MARGIN: Margin = Margin::new(40.0, 20.0, 70.0, 50.0);
const CHART_HEIGHT: u32 = 350;

/// Headroom over the temperature maximum. The deployed dashboard applies none.
pub const TEMPERATURE_HEADROOM: f64 = 1.0;

/// Rainfall (mm) at which a region's gradient reaches its darkest color.
const RAINFALL_SATURATION: f64 = 350.0;

fn hex(s: &str) -> Rgb {
    Rgb::from_hex(s).unwrap_or(NEUTRAL)
}

fn year_matches(period: Option<Period>, year: &str) -> bool {
    period
        .zip(year.trim().parse::<i32>().ok())
        .is_some_and(|(p, y)| p.year == y)
}

fn rainfall_in_year(r: &RegionObservation, year: &str) -> bool {
    year_matches(r.parsed(), year)
}

fn temperature_in_year(r: &TimeSeriesPoint, year: &str) -> bool {
    year_matches(r.parsed(), year)
}

fn temperature_in_month(r: &TimeSeriesPoint, month: &str) -> bool {
    r.parsed()
        .zip(month_abbr(month))
        .is_some_and(|(p, abbr)| p.month_abbr() == abbr)
}

fn climate_in_year(r: &ScatterObservation, year: &str) -> bool {
    year.trim().parse::<i32>().is_ok_and(|y| y == r.year)
}

fn site_named(r: &SiteMetric, name: &str) -> bool {
    r.name == name
}

fn climate_month(r: &ScatterObservation) -> &str {
    &r.month
}

fn climate_title(r: &ScatterObservation) -> String {
    format!("{} {}", r.month, r.year)
}

fn climate_year(r: &ScatterObservation) -> String {
    r.year.to_string()
}

fn site_name(r: &SiteMetric) -> &str {
    &r.name
}

fn region_measure(region: Region, low: &str, high: &str) -> Measure<RegionObservation> {
    let value: fn(&RegionObservation) -> f64 = match region {
        Region::Mountain => |r: &RegionObservation| r.mountain,
        Region::Hill => |r: &RegionObservation| r.hill,
        Region::Terai => |r: &RegionObservation| r.terai,
    };
    Measure::new(
        region.name(),
        region.name(),
        " mm",
        value,
        ColorPolicy::Sequential {
            low: hex(low),
            high: hex(high),
            domain: GradientDomain::Fixed(0.0, RAINFALL_SATURATION),
        },
    )
    .legend_at(200.0)
}

/// Grouped bars of monthly rainfall per region, sub-grouped by year.
pub fn rainfall(data: &[RegionObservation]) -> ChartConfig<RegionObservation> {
    let years = first_seen(data.iter().map(|r| r.year()));
    ChartConfig {
        name: RAINFALL,
        title: "Rainfall by Region and Year",
        height: CHART_HEIGHT,
        margin: CHART_MARGIN,
        titles: AxisTitles {
            x: Some("Month"),
            y: "Rainfall (mm)",
            y2: None,
            size: 11,
        },
        dimensions: vec![
            FilterDimension::series(
                "region",
                "All Regions",
                Region::ALL.iter().map(|r| r.name().to_string()).collect(),
            ),
            FilterDimension::records("year", "All Years", years, rainfall_in_year),
        ],
        captions: Some(CaptionSpec {
            dimension: "year",
            require_data: false,
            fade_in: true,
        }),
        legend: LegendLayout::Columns,
        encoding: Encoding::GroupedBars {
            category: RegionObservation::month,
            order: CategoryOrder::FirstSeen,
            group: RegionObservation::year,
            group_dimension: "year",
            series_dimension: "region",
            measures: vec![
                region_measure(Region::Mountain, "#D2B48C", "#8B4513"),
                region_measure(Region::Hill, "#ABEBC6", "#196F3D"),
                region_measure(Region::Terai, "#AED6F1", "#1A5276"),
            ],
            y: DomainPolicy::zero_based(1.0, RAINFALL_SATURATION),
            padding: 0.2,
        },
    }
}

/// One line per year through the canonical twelve months.
pub fn temperature(data: &[TimeSeriesPoint]) -> ChartConfig<TimeSeriesPoint> {
    let years = first_seen(data.iter().map(|r| r.year()));
    ChartConfig {
        name: TEMPERATURE,
        title: "Temperature by Month",
        height: CHART_HEIGHT,
        margin: CHART_MARGIN,
        titles: AxisTitles {
            x: Some("Month"),
            y: "Temperature (°C)",
            y2: None,
            size: 11,
        },
        dimensions: vec![
            FilterDimension::records(
                "month",
                "All Months",
                MONTH_NAMES.iter().map(|m| m.to_string()).collect(),
                temperature_in_month,
            ),
            FilterDimension::records("year", "All Years", years, temperature_in_year),
        ],
        captions: None,
        legend: LegendLayout::Columns,
        encoding: Encoding::Lines {
            category: TimeSeriesPoint::month,
            order: CategoryOrder::Canonical(&MONTHS),
            series: TimeSeriesPoint::year,
            value: Measure::new(
                "temperature",
                "Temperature",
                "°C",
                |r: &TimeSeriesPoint| r.metric,
                ColorPolicy::Ordinal(&SERIES_PAIR),
            ),
            y: DomainPolicy::zero_based(TEMPERATURE_HEADROOM, 30.0),
            padding: 0.2,
            grid: true,
        },
    }
}

/// Temperature against humidity, colored by month, with a least-squares trend.
pub fn climate(data: &[ScatterObservation]) -> ChartConfig<ScatterObservation> {
    let mut years: Vec<i32> = data.iter().map(|r| r.year).collect();
    years.sort_unstable();
    years.dedup();
    ChartConfig {
        name: CLIMATE,
        title: "Temperature vs Humidity Correlation",
        height: CHART_HEIGHT,
        margin: CHART_MARGIN,
        titles: AxisTitles {
            x: Some("Temperature (°C)"),
            y: "Humidity (%)",
            y2: None,
            size: 11,
        },
        dimensions: vec![FilterDimension::records(
            "year",
            "All Years",
            years.iter().map(|y| y.to_string()).collect(),
            climate_in_year,
        )],
        captions: Some(CaptionSpec {
            dimension: "year",
            require_data: true,
            fade_in: false,
        }),
        legend: LegendLayout::Columns,
        encoding: Encoding::Scatter {
            x: Measure::new(
                "temperature",
                "Temp",
                "°C",
                |r: &ScatterObservation| r.temperature,
                ColorPolicy::Fixed(NEUTRAL),
            ),
            y: Measure::new(
                "humidity",
                "Humidity",
                "%",
                |r: &ScatterObservation| r.humidity,
                ColorPolicy::Fixed(NEUTRAL),
            ),
            color_key: climate_month,
            color_order: CategoryOrder::Canonical(&MONTHS),
            color: ColorPolicy::Ordinal(&CATEGORY10),
            title: climate_title,
            group: climate_year,
            x_domain: DomainPolicy::padded(1.0, (0.0, 30.0)),
            y_domain: DomainPolicy::padded(5.0, (0.0, 100.0)),
            trend: true,
        },
    }
}

/// Fine and coarse particles stacked per site, humidity on a secondary axis.
pub fn pollution(data: &[SiteMetric]) -> ChartConfig<SiteMetric> {
    let sites = first_seen(data.iter().map(|r| r.name.as_str()));
    let extent_gradient = |low: &str, high: &str| ColorPolicy::Sequential {
        low: hex(low),
        high: hex(high),
        domain: GradientDomain::Extent,
    };
    ChartConfig {
        name: POLLUTION,
        title: "Air Pollution in the Valley",
        height: 235,
        margin: Margin::new(30.0, 80.0, 40.0, 60.0),
        titles: AxisTitles {
            x: None,
            y: "Particles (µg/m³)",
            y2: Some("Humidity (%)"),
            size: 10,
        },
        dimensions: vec![FilterDimension::records(
            "site",
            "All Sites",
            sites,
            site_named,
        )],
        captions: None,
        legend: LegendLayout::Flow,
        encoding: Encoding::Stacked {
            category: site_name,
            segments: vec![
                Measure::new(
                    "fine",
                    "Fine Particles",
                    " µg/m³",
                    |r: &SiteMetric| r.fine_particles,
                    extent_gradient("#6baed6", "#08519c"),
                ),
                Measure::new(
                    "coarse",
                    "Coarse Particles",
                    " µg/m³",
                    |r: &SiteMetric| r.coarse_particles,
                    extent_gradient("#fd8d3c", "#bd0026"),
                ),
            ],
            overlay: Measure::new(
                "humidity",
                "Humidity",
                "%",
                |r: &SiteMetric| r.humidity,
                ColorPolicy::Fixed(hex("#9467bd")),
            ),
            y: DomainPolicy::zero_based(1.1, 1.0).with_nice(None),
            y2: DomainPolicy::zero_based(1.0, 1.0).with_nice(None),
            padding: 0.3,
            ticks: 5,
        },
    }
}

/// All four charts over one dataset.
pub struct Dashboard {
    charts: Vec<Box<dyn Chart>>,
}

impl Dashboard {
    pub fn from_dataset(dataset: Dataset) -> Self {
        let Dataset {
            temperature: temperature_data,
            rainfall: rainfall_data,
            climate: climate_data,
            pollution: pollution_data,
        } = dataset;
        let charts: Vec<Box<dyn Chart>> = vec![
            Box::new(ChartPipeline::new(rainfall(&rainfall_data), rainfall_data)),
            Box::new(ChartPipeline::new(
                temperature(&temperature_data),
                temperature_data,
            )),
            Box::new(ChartPipeline::new(climate(&climate_data), climate_data)),
            Box::new(ChartPipeline::new(pollution(&pollution_data), pollution_data)),
        ];
        Self { charts }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.charts.iter().map(|c| c.name()).collect()
    }

    pub fn charts(&self) -> &[Box<dyn Chart>] {
        &self.charts
    }

    pub fn charts_mut(&mut self) -> &mut [Box<dyn Chart>] {
        &mut self.charts
    }

    pub fn chart(&self, name: &str) -> Result<&dyn Chart, DashboardError> {
        self.charts
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.as_ref())
            .ok_or_else(|| DashboardError::UnknownChart(name.to_string()))
    }

    pub fn chart_mut(&mut self, name: &str) -> Result<&mut (dyn Chart + 'static), DashboardError> {
        self.charts
            .iter_mut()
            .find(|c| c.name() == name)
            .map(|c| c.as_mut())
            .ok_or_else(|| DashboardError::UnknownChart(name.to_string()))
    }
}
