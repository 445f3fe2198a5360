//! Axis, grid and axis-title primitives.

use super::scene::{Anchor, Mark, Point, Primitive, Role, Stroke, TextStyle};
use super::types::PlotArea;
use super::util::{format_tick, tick_precision};
use crate::color::BLACK;
use crate::scale::{BandScale, LinearScale};

const TICK_LEN: f64 = 6.0;
const LABEL_GAP: f64 = 3.0;
const FONT_PX: f64 = 10.0;

fn axis_stroke() -> Stroke {
    Stroke::solid(BLACK, 1.0)
}

fn label_style() -> TextStyle {
    TextStyle::new(FONT_PX)
}

/// Decimal places for the ticks of `scale`.
fn precision(ticks: &[f64]) -> usize {
    match ticks {
        [a, b, ..] => tick_precision((b - a).abs()),
        _ => 0,
    }
}

/// Bottom axis with one tick per band, labelled at the band centre.
pub fn bottom_band(band: &BandScale, plot: &PlotArea) -> Vec<Primitive> {
    let y = plot.bottom();
    let mut out = vec![Primitive::new(
        Mark::line(Point::new(plot.left, y), Point::new(plot.right(), y), axis_stroke()),
        Role::Axis,
    )];
    for category in band.domain() {
        let Some(cx) = band.center(category) else {
            continue;
        };
        out.push(Primitive::new(
            Mark::line(Point::new(cx, y), Point::new(cx, y + TICK_LEN), axis_stroke()),
            Role::Axis,
        ));
        out.push(Primitive::new(
            Mark::text(
                Point::new(cx, y + TICK_LEN + LABEL_GAP + FONT_PX),
                category.clone(),
                label_style().anchor(Anchor::Middle),
            ),
            Role::Axis,
        ));
    }
    out
}

/// Bottom axis for a continuous x scale.
pub fn bottom_linear(scale: &LinearScale, plot: &PlotArea, count: usize, locale: &str) -> Vec<Primitive> {
    let y = plot.bottom();
    let ticks = scale.ticks(count);
    let prec = precision(&ticks);
    let mut out = vec![Primitive::new(
        Mark::line(Point::new(plot.left, y), Point::new(plot.right(), y), axis_stroke()),
        Role::Axis,
    )];
    for v in ticks {
        let x = scale.map(v);
        out.push(Primitive::new(
            Mark::line(Point::new(x, y), Point::new(x, y + TICK_LEN), axis_stroke()),
            Role::Axis,
        ));
        out.push(Primitive::new(
            Mark::text(
                Point::new(x, y + TICK_LEN + LABEL_GAP + FONT_PX),
                format_tick(v, prec, locale),
                label_style().anchor(Anchor::Middle),
            ),
            Role::Axis,
        ));
    }
    out
}

/// Vertical axis at `x`, ticks pointing left (`outward = -1`) or right (`outward = 1`).
fn vertical(scale: &LinearScale, plot: &PlotArea, x: f64, outward: f64, count: usize, locale: &str) -> Vec<Primitive> {
    let ticks = scale.ticks(count);
    let prec = precision(&ticks);
    let anchor = if outward < 0.0 { Anchor::End } else { Anchor::Start };
    let mut out = vec![Primitive::new(
        Mark::line(Point::new(x, plot.top), Point::new(x, plot.bottom()), axis_stroke()),
        Role::Axis,
    )];
    for v in ticks {
        let y = scale.map(v);
        out.push(Primitive::new(
            Mark::line(Point::new(x, y), Point::new(x + outward * TICK_LEN, y), axis_stroke()),
            Role::Axis,
        ));
        out.push(Primitive::new(
            Mark::text(
                Point::new(x + outward * (TICK_LEN + LABEL_GAP), y + FONT_PX * 0.32),
                format_tick(v, prec, locale),
                label_style().anchor(anchor),
            ),
            Role::Axis,
        ));
    }
    out
}

pub fn left(scale: &LinearScale, plot: &PlotArea, count: usize, locale: &str) -> Vec<Primitive> {
    vertical(scale, plot, plot.left, -1.0, count, locale)
}

pub fn right(scale: &LinearScale, plot: &PlotArea, count: usize, locale: &str) -> Vec<Primitive> {
    vertical(scale, plot, plot.right(), 1.0, count, locale)
}

/// Faint horizontal lines across the plot at each y tick.
pub fn horizontal_grid(scale: &LinearScale, plot: &PlotArea, count: usize) -> Vec<Primitive> {
    scale
        .ticks(count)
        .into_iter()
        .map(|v| {
            let y = scale.map(v);
            Primitive::new(
                Mark::line(Point::new(plot.left, y), Point::new(plot.right(), y), axis_stroke())
                    .with_opacity(0.1),
                Role::Grid,
            )
        })
        .collect()
}

/// Horizontal title centred under the plot.
pub fn x_title(text: &str, plot: &PlotArea, y: f64, size: f64) -> Primitive {
    Primitive::new(
        Mark::text(
            Point::new(plot.center_x(), y),
            text,
            TextStyle::new(size).anchor(Anchor::Middle),
        ),
        Role::Axis,
    )
}

/// Vertical title centred beside the plot at `x`.
pub fn y_title(text: &str, plot: &PlotArea, x: f64, size: f64) -> Primitive {
    Primitive::new(
        Mark::text(
            Point::new(x, plot.center_y()),
            text,
            TextStyle::new(size).anchor(Anchor::Middle).vertical(),
        ),
        Role::Axis,
    )
}
