//! climadash
//!
//! A small Rust library for filtering, scaling and rendering the climate
//! sample charts of a dashboard. Pairs with the `climadash` CLI and the
//! `climadash-gui` desktop front-end.
//!
//! ### Features
//! - One generic filter → scales → scene pipeline driving four chart styles
//!   (grouped bars, multi-series lines, scatter with trend, stacked bars with overlay)
//! - Selection controls with an "All" sentinel and reset, a resize watcher,
//!   and scoped tooltips
//! - Settled scenes rendered to SVG or PNG with plotters
//! - Filtered subsets saved as CSV or JSON, summary statistics, least-squares trend
//!
//! ### Example
//! ```no_run
//! use climadash::charts::Dashboard;
//! use climadash::data::{DataSource, SampleData};
//! use climadash::filter::Choice;
//!
//! let mut dashboard = Dashboard::from_dataset(SampleData.dataset()?);
//! let rainfall = dashboard.chart_mut("rainfall")?;
//! rainfall.controls_mut().choose("region", Choice::only("Mountain"))?;
//! rainfall.controls_mut().choose("year", Choice::only("2022"))?;
//! rainfall.render_file("rainfall.svg".as_ref(), 800)?;
//! println!("{:#?}", rainfall.summary());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod charts;
pub mod color;
pub mod controls;
pub mod data;
pub mod error;
pub mod filter;
pub mod models;
pub mod pipeline;
pub mod resize;
pub mod scale;
pub mod stats;
pub mod storage;
pub mod tooltip;
pub mod viz;

pub use charts::Dashboard;
pub use error::DashboardError;
pub use filter::{Choice, SelectionSet};
pub use models::Dimensions;
pub use pipeline::{Chart, ChartConfig, ChartPipeline};
