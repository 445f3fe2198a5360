//! Render stage: turn a subset and its scales into a [`Scene`].

use super::config::{ChartConfig, Encoding, Measure, first_seen};
use super::layout::{SERIES_KEY, Scales, XScale};
use crate::color::{BLACK, NEUTRAL, WHITE};
use crate::filter::{Choice, SelectionSet};
use crate::stats::Trend;
use crate::viz::legend::{self, LegendBox, LegendEntry, Swatch};
use crate::viz::scene::{
    Anchor, Datum, Mark, Placement, Point, Primitive, Role, Scene, Stroke, TextStyle,
    TooltipContent,
};
use crate::viz::text::text_width;
use crate::viz::transition::{Easing, Effect, Transition};
use crate::viz::util::format_value;
use crate::viz::{axis, curve};

const BAR_ENTER_MS: f64 = 800.0;
const BAR_STAGGER_MS: f64 = 50.0;
const LINE_ENTER_MS: f64 = 1500.0;
const DOT_STAGGER_MS: f64 = 150.0;

fn value_label<R>(m: &Measure<R>, v: f64) -> String {
    format!("{}{}", format_value(v), m.unit)
}

fn labelled_value<R>(m: &Measure<R>, v: f64) -> String {
    format!("{}: {}{}", m.label, format_value(v), m.unit)
}

fn swatch_color<R>(scales: &Scales, m: &Measure<R>) -> crate::color::Rgb {
    scales
        .colors
        .get(m.name)
        .map(|c| c.swatch(m.legend_value))
        .unwrap_or(NEUTRAL)
}

/// Build the full scene for one (subset, selection, scales) state.
pub fn build_scene<R>(
    config: &ChartConfig<R>,
    subset: &[&R],
    selection: &SelectionSet,
    scales: &Scales,
    width: u32,
    locale: &str,
) -> Scene {
    let mut scene = Scene::new(width, config.height);
    let plot = scales.plot;
    let y_ticks = match config.encoding {
        Encoding::Stacked { ticks, .. } => ticks,
        _ => 10,
    };

    if let Encoding::Lines { grid: true, .. } = config.encoding {
        scene.extend(axis::horizontal_grid(&scales.y, &plot, y_ticks));
    }
    match &scales.x {
        XScale::Band(band) => scene.extend(axis::bottom_band(band, &plot)),
        XScale::Linear(linear) => scene.extend(axis::bottom_linear(linear, &plot, 10, locale)),
    }
    scene.extend(axis::left(&scales.y, &plot, y_ticks, locale));
    if let Some(y2) = &scales.y2 {
        scene.extend(axis::right(y2, &plot, y_ticks, locale));
    }

    let title_px = config.titles.size as f64;
    if let Some(x_title) = config.titles.x {
        scene.push(axis::x_title(
            x_title,
            &plot,
            plot.bottom() + config.margin.bottom - 12.0,
            title_px,
        ));
    }
    scene.push(axis::y_title(
        config.titles.y,
        &plot,
        plot.left - config.margin.left + 14.0,
        title_px,
    ));
    if let Some(y2_title) = config.titles.y2 {
        scene.push(axis::y_title(
            y2_title,
            &plot,
            plot.right() + config.margin.right - 12.0,
            title_px,
        ));
    }

    let entries = match &config.encoding {
        Encoding::GroupedBars { .. } => grouped_bars(config, subset, selection, scales, &mut scene),
        Encoding::Lines { .. } => lines(config, subset, scales, &mut scene),
        Encoding::Scatter { .. } => scatter(config, subset, scales, &mut scene),
        Encoding::Stacked { .. } => stacked(config, subset, scales, &mut scene),
    };

    let legend_box = legend::layout(&entries, &plot, config.legend);
    if let Encoding::Scatter { x, y, trend: true, .. } = &config.encoding {
        trend_line(subset, x, y, scales, legend_box.as_ref(), &mut scene);
    }
    if let Some(b) = &legend_box {
        scene.extend(legend::draw(&entries, b));
    }
    captions(config, subset, selection, scales, &mut scene);
    scene
}

fn grouped_bars<R>(
    config: &ChartConfig<R>,
    subset: &[&R],
    selection: &SelectionSet,
    scales: &Scales,
    scene: &mut Scene,
) -> Vec<LegendEntry> {
    let Encoding::GroupedBars {
        category, group, ..
    } = &config.encoding
    else {
        return Vec::new();
    };
    let visible = config.encoding.visible_measures(selection);
    let (Some(band), Some(inner)) = (scales.band(), scales.inner.as_ref()) else {
        return Vec::new();
    };
    let baseline = scales.plot.bottom();
    let bar_w = inner.bandwidth() / visible.len().max(1) as f64;

    for month in band.domain() {
        let x0 = band.map(month);
        for record in subset.iter().filter(|r| category(r) == month.as_str()) {
            let year = group(record);
            let Some(gx) = inner.position(year) else {
                continue;
            };
            for (i, m) in visible.iter().enumerate() {
                let v = m.of(record);
                if v.is_nan() || v <= 0.0 {
                    continue;
                }
                let x = x0 + gx + i as f64 * bar_w;
                let y = scales.y.map(v);
                let mark = Mark::rect(x, y, bar_w, baseline - y, scales.color(m.name, "", v));
                let tooltip = TooltipContent {
                    lines: vec![value_label(m, v)],
                    placement: Placement::At(Point::new(x + bar_w / 2.0, y - 10.0)),
                };
                scene.push(
                    Primitive::new(
                        mark.clone(),
                        Role::Datum(Datum {
                            series: m.name.to_string(),
                            category: month.clone(),
                            group: Some(year.to_string()),
                            value: v,
                        }),
                    )
                    .enter(
                        Transition::new(Effect::Grow { baseline }, BAR_ENTER_MS, Easing::CubicOut)
                            .delayed(i as f64 * BAR_STAGGER_MS),
                    )
                    .hover(Some(mark.with_opacity(0.8)), Some(tooltip)),
                );
            }
        }
    }

    visible
        .iter()
        .map(|m| LegendEntry::new(m.label, Swatch::Square(swatch_color(scales, m), 8.0)))
        .collect()
}

fn lines<R>(config: &ChartConfig<R>, subset: &[&R], scales: &Scales, scene: &mut Scene) -> Vec<LegendEntry> {
    let Encoding::Lines {
        category,
        order,
        series,
        value,
        ..
    } = &config.encoding
    else {
        return Vec::new();
    };
    let Some(band) = scales.band() else {
        return Vec::new();
    };
    let keys = first_seen(subset.iter().map(|r| series(r)));
    let half = band.bandwidth() / 2.0;

    for key in &keys {
        let color = scales.color(SERIES_KEY, key, 0.0);
        let mut rows: Vec<&R> = subset
            .iter()
            .copied()
            .filter(|r| series(r) == key.as_str())
            .collect();
        rows.sort_by_key(|r| order.rank(category(r)));
        let points: Vec<Point> = rows
            .iter()
            .map(|r| Point::new(band.map(category(r)) + half, scales.y.map(value.of(r))))
            .collect();

        scene.push(
            Primitive::new(
                Mark::path(curve::monotone_x(&points), Stroke::solid(color, 2.0)),
                Role::Series(key.clone()),
            )
            .enter(Transition::new(Effect::Reveal, LINE_ENTER_MS, Easing::Linear)),
        );

        let datum = |r: &R| Datum {
            series: key.clone(),
            category: category(r).to_string(),
            group: None,
            value: value.of(r),
        };
        let pop = |i: usize| {
            Transition::new(Effect::Expand, LINE_ENTER_MS, Easing::ElasticOut)
                .delayed(i as f64 * DOT_STAGGER_MS)
        };
        for (i, (r, p)) in rows.iter().zip(&points).enumerate() {
            scene.push(Primitive::new(Mark::dot(*p, 3.0, color), Role::Datum(datum(*r))).enter(pop(i)));
        }
        for (i, (r, p)) in rows.iter().zip(&points).enumerate() {
            let target = Mark::Circle {
                center: *p,
                radius: 8.0,
                fill: None,
                stroke: None,
                opacity: 1.0,
            };
            let ring = Mark::Circle {
                center: *p,
                radius: 5.0,
                fill: None,
                stroke: Some(Stroke::solid(color, 2.0)),
                opacity: 1.0,
            };
            let tooltip = TooltipContent {
                lines: vec![value_label(value, value.of(r))],
                placement: Placement::At(p.offset(0.0, -10.0)),
            };
            scene.push(
                Primitive::new(target, Role::HitTarget(datum(*r)))
                    .enter(pop(i))
                    .hover(Some(ring), Some(tooltip)),
            );
        }
    }

    keys.iter()
        .map(|k| LegendEntry::new(k.clone(), Swatch::Square(scales.color(SERIES_KEY, k, 0.0), 12.0)))
        .collect()
}

fn scatter<R>(config: &ChartConfig<R>, subset: &[&R], scales: &Scales, scene: &mut Scene) -> Vec<LegendEntry> {
    let Encoding::Scatter {
        x,
        y,
        color_key,
        color_order,
        title,
        group,
        ..
    } = &config.encoding
    else {
        return Vec::new();
    };
    let Some(xs) = scales.linear_x() else {
        return Vec::new();
    };

    for r in subset {
        let (xv, yv) = (x.of(r), y.of(r));
        let center = Point::new(xs.map(xv), scales.y.map(yv));
        let key = color_key(r);
        let color = scales.color(SERIES_KEY, key, 0.0);
        let mark = Mark::Circle {
            center,
            radius: 6.0,
            fill: Some(color),
            stroke: Some(Stroke::solid(WHITE, 1.5)),
            opacity: 0.8,
        };
        let hovered = Mark::Circle {
            center,
            radius: 8.0,
            fill: Some(color),
            stroke: Some(Stroke::solid(BLACK, 2.0)),
            opacity: 1.0,
        };
        let tooltip = TooltipContent {
            lines: vec![title(r), labelled_value(x, xv), labelled_value(y, yv)],
            placement: Placement::Pointer,
        };
        scene.push(
            Primitive::new(
                mark,
                Role::Datum(Datum {
                    series: key.to_string(),
                    category: key.to_string(),
                    group: Some(group(r)),
                    value: yv,
                }),
            )
            .hover(Some(hovered), Some(tooltip)),
        );
    }

    let mut present = first_seen(subset.iter().map(|r| color_key(r)));
    present.sort_by_key(|c| color_order.rank(c));
    present
        .into_iter()
        .map(|c| {
            let color = scales.color(SERIES_KEY, &c, 0.0);
            LegendEntry::new(c, Swatch::Circle(color, 5.0))
        })
        .collect()
}

fn trend_line<R>(
    subset: &[&R],
    x: &Measure<R>,
    y: &Measure<R>,
    scales: &Scales,
    legend_box: Option<&LegendBox>,
    scene: &mut Scene,
) {
    if subset.len() < 2 {
        return;
    }
    let Some(xs) = scales.linear_x() else {
        return;
    };
    let pairs: Vec<(f64, f64)> = subset.iter().map(|r| (x.of(r), y.of(r))).collect();
    let Some(trend) = Trend::fit(&pairs) else {
        return;
    };
    let (d0, d1) = xs.domain;
    let ends = vec![
        Point::new(xs.map(d0), scales.y.map(trend.at(d0))),
        Point::new(xs.map(d1), scales.y.map(trend.at(d1))),
    ];
    let correlation = trend.correlation();
    scene.push(Primitive::new(
        Mark::path(ends, Stroke::dashed(NEUTRAL, 1.5, 5.0, 5.0)),
        Role::Trend(correlation),
    ));

    let plot = scales.plot;
    let label = correlation.to_string();
    let label_w = text_width(&label, 10.0);
    let label_y = plot.top + 20.0;
    let mut label_x = plot.right() - 140.0;
    if let Some(b) = legend_box {
        let overlaps_rows = label_y >= b.y && label_y - 10.0 <= b.y + b.height;
        if overlaps_rows && label_x + label_w > b.x {
            label_x = b.x - 8.0 - label_w;
        }
    }
    scene.push(Primitive::new(
        Mark::text(
            Point::new(label_x.max(plot.left), label_y),
            label,
            TextStyle::new(10.0).anchor(Anchor::Start).italic(),
        ),
        Role::Trend(correlation),
    ));
}

fn stacked<R>(config: &ChartConfig<R>, subset: &[&R], scales: &Scales, scene: &mut Scene) -> Vec<LegendEntry> {
    let Encoding::Stacked {
        category,
        segments,
        overlay,
        ..
    } = &config.encoding
    else {
        return Vec::new();
    };
    let (Some(band), Some(y2)) = (scales.band(), scales.y2.as_ref()) else {
        return Vec::new();
    };
    let width = band.bandwidth();

    for r in subset {
        let name = category(r);
        let x = band.map(name);
        let mut base = 0.0;
        for m in segments {
            let v = m.of(r);
            let top = scales.y.map(base + v);
            let bottom = scales.y.map(base);
            base += v;
            let mark = Mark::Rect {
                x,
                y: top,
                width,
                height: bottom - top,
                fill: scales.color(m.name, name, v),
                stroke: Some(Stroke::solid(WHITE, 1.0)),
                corner: 0.0,
                opacity: 1.0,
            };
            let tooltip = TooltipContent {
                lines: vec![name.to_string(), labelled_value(m, v)],
                placement: Placement::Pointer,
            };
            scene.push(
                Primitive::new(
                    mark,
                    Role::Datum(Datum {
                        series: m.name.to_string(),
                        category: name.to_string(),
                        group: None,
                        value: v,
                    }),
                )
                .hover(None, Some(tooltip)),
            );
        }
    }

    let overlay_color = scales.color(overlay.name, "", 0.0);
    let points: Vec<Point> = subset
        .iter()
        .map(|r| Point::new(band.map(category(r)) + width / 2.0, y2.map(overlay.of(r))))
        .collect();
    scene.push(Primitive::new(
        Mark::path(points.clone(), Stroke::solid(overlay_color, 2.0)),
        Role::Series(overlay.name.to_string()),
    ));
    for (r, p) in subset.iter().zip(points) {
        let v = overlay.of(r);
        let tooltip = TooltipContent {
            lines: vec![category(r).to_string(), labelled_value(overlay, v)],
            placement: Placement::Pointer,
        };
        scene.push(
            Primitive::new(
                Mark::dot(p, 4.0, overlay_color),
                Role::Datum(Datum {
                    series: overlay.name.to_string(),
                    category: category(r).to_string(),
                    group: None,
                    value: v,
                }),
            )
            .hover(None, Some(tooltip)),
        );
    }

    segments
        .iter()
        .map(|m| LegendEntry::new(m.label, Swatch::Square(swatch_color(scales, m), 10.0)))
        .chain(std::iter::once(LegendEntry::new(
            overlay.label,
            Swatch::Line(overlay_color),
        )))
        .collect()
}

fn captions<R>(
    config: &ChartConfig<R>,
    subset: &[&R],
    selection: &SelectionSet,
    scales: &Scales,
    scene: &mut Scene,
) {
    let Some(spec) = config.captions else {
        return;
    };
    if !selection.get(spec.dimension).is_all() {
        return;
    }
    let Some(dim) = config.dimension(spec.dimension) else {
        return;
    };
    let plot = scales.plot;
    for (i, option) in dim.options.iter().enumerate() {
        let choice = Choice::only(option.clone());
        if spec.require_data && !subset.iter().any(|r| dim.admits(r, &choice)) {
            continue;
        }
        let mut caption = Primitive::new(
            Mark::text(
                Point::new(plot.left + 10.0 + i as f64 * 50.0, plot.top - 10.0),
                option.clone(),
                TextStyle::new(10.0).bold(),
            ),
            Role::Caption,
        );
        if spec.fade_in {
            caption = caption.enter(
                Transition::new(Effect::FadeIn, 500.0, Easing::CubicInOut).delayed(i as f64 * 100.0),
            );
        }
        scene.push(caption);
    }
}

