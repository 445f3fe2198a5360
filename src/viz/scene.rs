//! Retained scene model produced by the render stage.
//!
//! A [`Scene`] is a flat list of [`Primitive`]s in paint order. Each primitive
//! carries its settled [`Mark`], an optional enter [`Transition`], and an
//! optional [`Hover`] state. Back-ends never see transitions directly: they ask
//! the scene for a [`Scene::frame`] at some elapsed time and paint the marks.

use super::curve;
use super::transition::{Effect, Transition};
use crate::color::Rgb;
use crate::stats::Correlation;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    pub fn offset(self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStyle {
    pub size: f64,
    pub color: Rgb,
    pub anchor: Anchor,
    pub bold: bool,
    pub italic: bool,
    /// Rotated a quarter turn counter-clockwise (reads bottom to top).
    pub vertical: bool,
}

impl TextStyle {
    pub fn new(size: f64) -> Self {
        Self {
            size,
            color: crate::color::BLACK,
            anchor: Anchor::Start,
            bold: false,
            italic: false,
            vertical: false,
        }
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn vertical(mut self) -> Self {
        self.vertical = true;
        self
    }

    pub fn color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub color: Rgb,
    pub width: f64,
    /// `(dash, gap)` lengths in pixels.
    pub dash: Option<(f64, f64)>,
}

impl Stroke {
    pub fn solid(color: Rgb, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: Rgb, width: f64, dash: f64, gap: f64) -> Self {
        Self {
            color,
            width,
            dash: Some((dash, gap)),
        }
    }
}

/// One paintable shape in surface pixels. Text `at` is the baseline point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Mark {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Rgb,
        stroke: Option<Stroke>,
        corner: f64,
        opacity: f64,
    },
    Path {
        points: Vec<Point>,
        stroke: Stroke,
        opacity: f64,
    },
    Circle {
        center: Point,
        radius: f64,
        fill: Option<Rgb>,
        stroke: Option<Stroke>,
        opacity: f64,
    },
    Text {
        at: Point,
        text: String,
        style: TextStyle,
        opacity: f64,
    },
}

impl Mark {
    pub fn rect(x: f64, y: f64, width: f64, height: f64, fill: Rgb) -> Self {
        Mark::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke: None,
            corner: 0.0,
            opacity: 1.0,
        }
    }

    pub fn line(a: Point, b: Point, stroke: Stroke) -> Self {
        Mark::Path {
            points: vec![a, b],
            stroke,
            opacity: 1.0,
        }
    }

    pub fn path(points: Vec<Point>, stroke: Stroke) -> Self {
        Mark::Path {
            points,
            stroke,
            opacity: 1.0,
        }
    }

    pub fn dot(center: Point, radius: f64, fill: Rgb) -> Self {
        Mark::Circle {
            center,
            radius,
            fill: Some(fill),
            stroke: None,
            opacity: 1.0,
        }
    }

    pub fn text(at: Point, text: impl Into<String>, style: TextStyle) -> Self {
        Mark::Text {
            at,
            text: text.into(),
            style,
            opacity: 1.0,
        }
    }

    pub fn opacity(&self) -> f64 {
        match self {
            Mark::Rect { opacity, .. }
            | Mark::Path { opacity, .. }
            | Mark::Circle { opacity, .. }
            | Mark::Text { opacity, .. } => *opacity,
        }
    }

    pub fn with_opacity(mut self, value: f64) -> Self {
        match &mut self {
            Mark::Rect { opacity, .. }
            | Mark::Path { opacity, .. }
            | Mark::Circle { opacity, .. }
            | Mark::Text { opacity, .. } => *opacity = value,
        }
        self
    }

    pub fn with_stroke(mut self, value: Stroke) -> Self {
        match &mut self {
            Mark::Rect { stroke, .. } | Mark::Circle { stroke, .. } => *stroke = Some(value),
            Mark::Path { stroke, .. } => *stroke = value,
            Mark::Text { .. } => {}
        }
        self
    }

    /// Does the mark's filled or stroked area contain `p`? Text never does.
    pub fn contains(&self, p: Point) -> bool {
        match self {
            Mark::Rect {
                x,
                y,
                width,
                height,
                ..
            } => p.x >= *x && p.x <= x + width && p.y >= *y && p.y <= y + height,
            Mark::Circle {
                center,
                radius,
                stroke,
                ..
            } => {
                let half = stroke.map(|s| s.width / 2.0).unwrap_or(0.0);
                center.distance(p) <= radius + half
            }
            Mark::Path { points, stroke, .. } => {
                let reach = (stroke.width / 2.0).max(3.0);
                points
                    .windows(2)
                    .any(|w| distance_to_segment(p, w[0], w[1]) <= reach)
            }
            Mark::Text { .. } => false,
        }
    }

    /// The mark as it appears at eased progress `t` of `effect`.
    fn at_progress(&self, effect: Effect, t: f64) -> Mark {
        let mut mark = self.clone();
        match (effect, &mut mark) {
            (
                Effect::Grow { baseline },
                Mark::Rect {
                    y, height, opacity, ..
                },
            ) => {
                let full = *height;
                *height = (full * t).max(0.0);
                *y = baseline - (baseline - *y) * t;
                *opacity *= t.clamp(0.0, 1.0);
            }
            (Effect::Expand, Mark::Circle { radius, .. }) => {
                *radius = (*radius * t).max(0.0);
            }
            (Effect::Reveal, Mark::Path { points, .. }) => {
                *points = curve::truncate(points, t);
            }
            (Effect::FadeIn, m) => {
                let faded = m.opacity() * t.clamp(0.0, 1.0);
                *m = m.clone().with_opacity(faded);
            }
            _ => {}
        }
        mark
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0);
    p.distance(a.lerp(b, t))
}

/// One observation behind a mark.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Datum {
    /// Series (region, year, month, segment) the mark belongs to.
    pub series: String,
    /// Category on the band axis, or the colour category for scatter points.
    pub category: String,
    /// Sub-group within the category (year of a grouped bar or scatter point).
    pub group: Option<String>,
    pub value: f64,
}

/// What a primitive represents, for hit testing, tests and tooling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Role {
    Axis,
    Grid,
    /// Line or overlay path of one series.
    Series(String),
    Datum(Datum),
    /// Invisible enlarged target standing in for a small datum marker.
    HitTarget(Datum),
    Trend(Correlation),
    Legend,
    Caption,
}

/// Where a tooltip appears.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Placement {
    /// Floating box that follows the pointer.
    Pointer,
    /// Inline label fixed at a point of the surface.
    At(Point),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipContent {
    pub lines: Vec<String>,
    pub placement: Placement,
}

/// How a primitive changes while the pointer is over it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hover {
    /// Replacement mark while hovered.
    pub mark: Option<Mark>,
    pub tooltip: Option<TooltipContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Primitive {
    pub mark: Mark,
    pub role: Role,
    pub enter: Option<Transition>,
    pub hover: Option<Hover>,
}

impl Primitive {
    pub fn new(mark: Mark, role: Role) -> Self {
        Self {
            mark,
            role,
            enter: None,
            hover: None,
        }
    }

    pub fn enter(mut self, transition: Transition) -> Self {
        self.enter = Some(transition);
        self
    }

    pub fn hover(mut self, mark: Option<Mark>, tooltip: Option<TooltipContent>) -> Self {
        self.hover = Some(Hover { mark, tooltip });
        self
    }

    /// The mark at `elapsed_ms` after the redraw began.
    pub fn mark_at(&self, elapsed_ms: f64) -> Mark {
        match &self.enter {
            Some(tr) if !tr.is_done(elapsed_ms) => {
                self.mark.at_progress(tr.effect, tr.progress(elapsed_ms))
            }
            _ => self.mark.clone(),
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.hover.is_some()
    }

    pub fn datum(&self) -> Option<&Datum> {
        match &self.role {
            Role::Datum(d) | Role::HitTarget(d) => Some(d),
            _ => None,
        }
    }
}

/// Everything one chart draws for one (selection, dimensions) state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub primitives: Vec<Primitive>,
}

impl Scene {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            primitives: Vec::new(),
        }
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn extend<I: IntoIterator<Item = Primitive>>(&mut self, primitives: I) {
        self.primitives.extend(primitives);
    }

    /// Marks in paint order at `elapsed_ms`. A hovered primitive whose enter transition has
    /// finished is swapped for its hover mark.
    pub fn frame(&self, elapsed_ms: f64, hovered: Option<usize>) -> Vec<Mark> {
        self.primitives
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let settled = p.enter.is_none_or(|tr| tr.is_done(elapsed_ms));
                let hover_mark = (hovered == Some(i) && settled)
                    .then(|| p.hover.as_ref().and_then(|h| h.mark.clone()))
                    .flatten();
                hover_mark.unwrap_or_else(|| p.mark_at(elapsed_ms))
            })
            .collect()
    }

    /// Final state: every transition complete, nothing hovered.
    pub fn settled(&self) -> Vec<Mark> {
        self.primitives.iter().map(|p| p.mark.clone()).collect()
    }

    /// Time until the last enter transition finishes.
    pub fn duration_ms(&self) -> f64 {
        self.primitives
            .iter()
            .filter_map(|p| p.enter.map(|t| t.end_ms()))
            .fold(0.0, f64::max)
    }

    /// Topmost interactive primitive under `p`, tested against its shape at `elapsed_ms`.
    pub fn hit_test(&self, p: Point, elapsed_ms: f64) -> Option<usize> {
        self.primitives
            .iter()
            .enumerate()
            .rev()
            .find(|(_, prim)| prim.is_interactive() && prim.mark_at(elapsed_ms).contains(p))
            .map(|(i, _)| i)
    }

    pub fn tooltip(&self, index: usize) -> Option<&TooltipContent> {
        self.primitives
            .get(index)
            .and_then(|p| p.hover.as_ref())
            .and_then(|h| h.tooltip.as_ref())
    }

    /// Data primitives (bars, markers, segments, points), in paint order.
    pub fn data(&self) -> impl Iterator<Item = (&Primitive, &Datum)> {
        self.primitives.iter().filter_map(|p| match &p.role {
            Role::Datum(d) => Some((p, d)),
            _ => None,
        })
    }

    pub fn with_role<'a>(&'a self, pred: impl Fn(&Role) -> bool + 'a) -> impl Iterator<Item = &'a Primitive> + 'a {
        self.primitives.iter().filter(move |p| pred(&p.role))
    }

    /// Trend annotation, when the scene has one.
    pub fn trend(&self) -> Option<Correlation> {
        self.primitives.iter().find_map(|p| match p.role {
            Role::Trend(c) => Some(c),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.primitives.iter().filter_map(|p| match &p.mark {
            Mark::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viz::transition::Easing;

    fn bar() -> Primitive {
        Primitive::new(Mark::rect(10.0, 50.0, 20.0, 50.0, crate::color::BLACK), Role::Axis)
            .enter(Transition::new(
                Effect::Grow { baseline: 100.0 },
                800.0,
                Easing::Linear,
            ))
            .hover(Some(Mark::rect(10.0, 50.0, 20.0, 50.0, crate::color::BLACK).with_opacity(0.8)), None)
    }

    #[test]
    fn grow_starts_at_baseline() {
        let p = bar();
        match p.mark_at(0.0) {
            Mark::Rect { y, height, opacity, .. } => {
                assert_eq!(y, 100.0);
                assert_eq!(height, 0.0);
                assert_eq!(opacity, 0.0);
            }
            other => panic!("unexpected {other:?}"),
        }
        match p.mark_at(400.0) {
            Mark::Rect { y, height, .. } => {
                assert_eq!(y, 75.0);
                assert_eq!(height, 25.0);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(p.mark_at(800.0), p.mark);
    }

    #[test]
    fn hover_follows_the_growing_bar() {
        let mut scene = Scene::new(100, 100);
        scene.push(bar());
        let inside = Point::new(20.0, 80.0);
        // still below the point at 100 ms, covers it by 400 ms
        assert_eq!(scene.hit_test(inside, 100.0), None);
        assert_eq!(scene.hit_test(inside, 400.0), Some(0));
        assert_eq!(scene.hit_test(inside, 900.0), Some(0));
        assert_eq!(scene.hit_test(Point::new(90.0, 10.0), 900.0), None);
        let hovered = scene.frame(900.0, Some(0));
        assert_eq!(hovered[0].opacity(), 0.8);
    }
}
