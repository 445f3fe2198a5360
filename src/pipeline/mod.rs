//! Generic chart pipeline: filter → scales → scene, parameterized by a [`ChartConfig`].
//!
//! One [`ChartPipeline`] drives any of the four visual styles. It owns its
//! selection controls, the last reported surface size and the current scene,
//! and rebuilds the scene only when the selection, size or locale changed.

mod config;
mod layout;
mod render;

pub use config::{
    AxisTitles, CaptionSpec, CategoryOrder, ChartConfig, Encoding, Measure, first_seen,
};
pub use layout::{SERIES_KEY, Scales, XScale, compute_scales};
pub use render::build_scene;

use crate::controls::SelectionControls;
use crate::error::DashboardError;
use crate::filter::filter;
use crate::models::Dimensions;
use crate::resize::ResizeWatcher;
use crate::stats::{Summary, Trend, summarize};
use crate::storage;
use crate::viz::{self, Scene};
use anyhow::Result;
use log::debug;
use serde::Serialize;
use std::path::Path;
use std::sync::mpsc::{Receiver, TryRecvError};

/// Object-safe face of a chart, so a dashboard can hold charts over different record types.
pub trait Chart {
    fn name(&self) -> &'static str;
    fn title(&self) -> &'static str;
    /// Visual style ("grouped bars", "lines", ...).
    fn kind(&self) -> &'static str;
    /// Fixed surface height.
    fn height(&self) -> u32;
    fn controls(&self) -> &SelectionControls;
    fn controls_mut(&mut self) -> &mut SelectionControls;
    /// Locale tag for tick labels ("en", "de", ...).
    fn set_locale(&mut self, locale: &str);
    /// Attach a new resize watcher whose reports this chart consumes on [`Chart::refresh`].
    fn watch(&mut self) -> ResizeWatcher;
    /// Last reported surface size.
    fn dimensions(&self) -> Option<Dimensions>;
    /// Drain pending size reports and rebuild the scene if anything changed.
    /// Returns `true` when a new scene was built.
    fn refresh(&mut self) -> bool;
    fn scene(&self) -> Option<&Scene>;
    /// Number of scenes built so far.
    fn redraws(&self) -> u64;
    /// Scene for the current selection at `width`, independent of the watched size.
    fn snapshot(&self, width: u32) -> Scene;
    /// Draw the settled chart at `width` to an `.svg` or `.png` file.
    fn render_file(&self, path: &Path, width: u32) -> Result<()>;
    /// Write the filtered subset as `.csv` or `.json`. Returns the number of records written.
    fn export(&self, path: &Path) -> Result<usize>;
    /// Per-measure statistics over the filtered subset.
    fn summary(&self) -> Vec<Summary>;
    /// Least-squares fit for scatter charts.
    fn trend(&self) -> Option<Trend>;
    fn subset_len(&self) -> usize;
}

/// (controls revision, surface size, locale) a scene was built for.
type DrawKey = (u64, Dimensions, String);

pub struct ChartPipeline<R> {
    config: ChartConfig<R>,
    data: Vec<R>,
    controls: SelectionControls,
    locale: String,
    dims: Option<Dimensions>,
    resize_rx: Option<Receiver<Dimensions>>,
    scene: Option<Scene>,
    drawn: Option<DrawKey>,
    redraws: u64,
}

impl<R> ChartPipeline<R> {
    pub fn new(config: ChartConfig<R>, data: Vec<R>) -> Self {
        let controls = SelectionControls::from_dimensions(config.name, &config.dimensions);
        Self {
            config,
            data,
            controls,
            locale: "en".to_string(),
            dims: None,
            resize_rx: None,
            scene: None,
            drawn: None,
            redraws: 0,
        }
    }

    pub fn config(&self) -> &ChartConfig<R> {
        &self.config
    }

    /// Records surviving the current selection, in input order.
    pub fn subset(&self) -> Vec<&R> {
        filter(&self.data, &self.config.dimensions, self.controls.selection())
    }

    pub fn scales(&self, dims: Dimensions) -> Scales {
        compute_scales(
            &self.config,
            &self.subset(),
            self.controls.selection(),
            dims,
        )
    }

    fn build(&self, dims: Dimensions) -> Scene {
        let subset = self.subset();
        let selection = self.controls.selection();
        let scales = compute_scales(&self.config, &subset, selection, dims);
        build_scene(
            &self.config,
            &subset,
            selection,
            &scales,
            dims.width,
            &self.locale,
        )
    }
}

impl<R: Serialize + 'static> Chart for ChartPipeline<R> {
    fn name(&self) -> &'static str {
        self.config.name
    }

    fn title(&self) -> &'static str {
        self.config.title
    }

    fn kind(&self) -> &'static str {
        self.config.encoding.kind()
    }

    fn height(&self) -> u32 {
        self.config.height
    }

    fn controls(&self) -> &SelectionControls {
        &self.controls
    }

    fn controls_mut(&mut self) -> &mut SelectionControls {
        &mut self.controls
    }

    fn set_locale(&mut self, locale: &str) {
        self.locale = locale.to_string();
    }

    fn watch(&mut self) -> ResizeWatcher {
        let (watcher, rx) = ResizeWatcher::attach(self.config.height);
        self.resize_rx = Some(rx);
        watcher
    }

    fn dimensions(&self) -> Option<Dimensions> {
        self.dims
    }

    fn refresh(&mut self) -> bool {
        let mut disconnected = false;
        if let Some(rx) = &self.resize_rx {
            loop {
                match rx.try_recv() {
                    Ok(dims) => self.dims = Some(dims),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        disconnected = true;
                        break;
                    }
                }
            }
        }
        if disconnected {
            debug!("{}: resize watcher detached", self.config.name);
            self.resize_rx = None;
        }

        let Some(dims) = self.dims.filter(|d| d.width > 0 && d.height > 0) else {
            self.scene = None;
            self.drawn = None;
            return false;
        };
        let key = (self.controls.revision(), dims, self.locale.clone());
        if self.drawn.as_ref() == Some(&key) {
            return false;
        }
        let scene = self.build(dims);
        debug!(
            "{}: redraw #{} at {}x{} ({} primitives)",
            self.config.name,
            self.redraws + 1,
            dims.width,
            dims.height,
            scene.primitives.len()
        );
        self.scene = Some(scene);
        self.drawn = Some(key);
        self.redraws += 1;
        true
    }

    fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    fn redraws(&self) -> u64 {
        self.redraws
    }

    fn snapshot(&self, width: u32) -> Scene {
        self.build(Dimensions::new(width, self.config.height))
    }

    fn render_file(&self, path: &Path, width: u32) -> Result<()> {
        viz::render_to_file(&self.snapshot(width), path)
    }

    fn export(&self, path: &Path) -> Result<usize> {
        let subset = self.subset();
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "csv" => storage::save_csv(&subset, path)?,
            "json" => storage::save_json(&subset, path)?,
            _ => return Err(DashboardError::UnsupportedExportFormat(ext).into()),
        }
        Ok(subset.len())
    }

    fn summary(&self) -> Vec<Summary> {
        let subset = self.subset();
        let selection = self.controls.selection();
        let observed_only = matches!(self.config.encoding, Encoding::GroupedBars { .. });
        self.config
            .encoding
            .visible_measures(selection)
            .into_iter()
            .map(|m| {
                let values: Vec<f64> = subset
                    .iter()
                    .map(|r| m.of(r))
                    .filter(|v| !observed_only || *v > 0.0)
                    .collect();
                summarize(m.label, &values)
            })
            .collect()
    }

    fn trend(&self) -> Option<Trend> {
        let Encoding::Scatter { x, y, .. } = &self.config.encoding else {
            return None;
        };
        let pairs: Vec<(f64, f64)> = self.subset().iter().map(|r| (x.of(r), y.of(r))).collect();
        Trend::fit(&pairs)
    }

    fn subset_len(&self) -> usize {
        self.subset().len()
    }
}
