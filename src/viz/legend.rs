//! Legend synthesis: a bordered box at the top-right of the plot area.

use super::scene::{Anchor, Mark, Point, Primitive, Role, Stroke, TextStyle};
use super::text::{fit_label, text_width};
use super::transition::{Easing, Effect, Transition};
use super::types::{LegendLayout, PlotArea};
use crate::color::{LEGEND_BORDER, Rgb, WHITE};

const ROW_H: f64 = 18.0;
const PAD_X: f64 = 10.0;
const PAD_Y: f64 = 5.0;
const TEXT_OFFSET: f64 = 20.0;
const TRAILING_GAP: f64 = 12.0;
const FONT_SIZE: f64 = 10.0;
const MIN_BOX_W: f64 = 80.0;
const MIN_COL_W: f64 = 60.0;
/// Longest label drawn before truncation.
const MAX_LABEL_W: f64 = 110.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Swatch {
    /// Filled square with the given side length.
    Square(Rgb, f64),
    /// Filled circle with the given radius.
    Circle(Rgb, f64),
    /// Short horizontal stroke, for line overlays.
    Line(Rgb),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub swatch: Swatch,
}

impl LegendEntry {
    pub fn new(label: impl Into<String>, swatch: Swatch) -> Self {
        Self {
            label: label.into(),
            swatch,
        }
    }
}

/// Box geometry computed before drawing so neighbours (e.g. a trend label) can avoid it.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Entry origins (top-left of each row slot).
    slots: Vec<Point>,
    labels: Vec<String>,
}

fn entry_width(label: &str) -> f64 {
    TEXT_OFFSET + text_width(label, FONT_SIZE) + TRAILING_GAP
}

/// Lay out `entries` against the plot area. `None` when there is nothing to list.
pub fn layout(entries: &[LegendEntry], plot: &PlotArea, mode: LegendLayout) -> Option<LegendBox> {
    if entries.is_empty() {
        return None;
    }
    let labels: Vec<String> = entries
        .iter()
        .map(|e| fit_label(&e.label, FONT_SIZE, MAX_LABEL_W))
        .collect();
    let box_y = (plot.top - 35.0).max(2.0);

    let (slots_rel, content_w, rows) = match mode {
        LegendLayout::Columns => {
            let columns = if entries.len() > 6 { 2 } else { 1 };
            let rows = entries.len().div_ceil(columns);
            let col_w = labels
                .iter()
                .map(|l| entry_width(l))
                .fold(MIN_COL_W, f64::max);
            let slots: Vec<(f64, f64)> = (0..entries.len())
                .map(|i| ((i / rows) as f64 * col_w, (i % rows) as f64 * ROW_H))
                .collect();
            (slots, columns as f64 * col_w, rows)
        }
        LegendLayout::Flow => {
            let max_w = (plot.width - 2.0 * PAD_X).max(MIN_COL_W);
            let mut slots = Vec::with_capacity(labels.len());
            let (mut x, mut row, mut widest) = (0.0_f64, 0usize, 0.0_f64);
            for label in &labels {
                let w = entry_width(label);
                if x > 0.0 && x + w > max_w {
                    row += 1;
                    x = 0.0;
                }
                slots.push((x, row as f64 * ROW_H));
                x += w;
                widest = widest.max(x);
            }
            (slots, widest, row + 1)
        }
    };

    let width = (content_w + PAD_X).max(MIN_BOX_W);
    let height = rows as f64 * ROW_H + 2.0 * PAD_Y;
    let x = plot.right() - width;
    let slots = slots_rel
        .into_iter()
        .map(|(dx, dy)| Point::new(x + PAD_X + dx, box_y + PAD_Y + dy))
        .collect();
    Some(LegendBox {
        x,
        y: box_y,
        width,
        height,
        slots,
        labels,
    })
}

/// Background box plus one swatch and label per entry; entries fade in one after another.
pub fn draw(entries: &[LegendEntry], layout: &LegendBox) -> Vec<Primitive> {
    let mut out = Vec::with_capacity(1 + entries.len() * 2);
    out.push(Primitive::new(
        Mark::Rect {
            x: layout.x,
            y: layout.y,
            width: layout.width,
            height: layout.height,
            fill: WHITE,
            stroke: Some(Stroke::solid(LEGEND_BORDER, 1.0)),
            corner: 5.0,
            opacity: 1.0,
        },
        Role::Legend,
    ));
    for (i, ((entry, origin), label)) in entries
        .iter()
        .zip(&layout.slots)
        .zip(&layout.labels)
        .enumerate()
    {
        let fade = Transition::new(Effect::FadeIn, 500.0, Easing::CubicInOut).delayed(i as f64 * 100.0);
        let swatch = match entry.swatch {
            Swatch::Square(color, size) => Mark::rect(origin.x, origin.y, size, size, color),
            Swatch::Circle(color, r) => Mark::dot(origin.offset(r, 6.0), r, color),
            Swatch::Line(color) => Mark::line(
                origin.offset(0.0, 6.0),
                origin.offset(14.0, 6.0),
                Stroke::solid(color, 2.0),
            ),
        };
        out.push(Primitive::new(swatch, Role::Legend).enter(fade));
        out.push(
            Primitive::new(
                Mark::text(
                    origin.offset(TEXT_OFFSET, 10.0),
                    label.clone(),
                    TextStyle::new(FONT_SIZE).anchor(Anchor::Start),
                ),
                Role::Legend,
            )
            .enter(fade),
        );
    }
    out
}
