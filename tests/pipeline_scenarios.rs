use climadash::Chart;
use climadash::charts::Dashboard;
use climadash::data::sample;
use climadash::filter::Choice;
use climadash::viz::{Mark, Role, Scene};

fn dashboard() -> Dashboard {
    Dashboard::from_dataset(sample())
}

fn rect_height(mark: &Mark) -> f64 {
    match mark {
        Mark::Rect { height, .. } => *height,
        other => panic!("expected a bar, got {other:?}"),
    }
}

fn captions(scene: &Scene) -> Vec<String> {
    scene
        .with_role(|r| matches!(r, Role::Caption))
        .filter_map(|p| match &p.mark {
            Mark::Text { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn mountain_2022_bars() {
    let mut dash = dashboard();
    let chart = dash.chart_mut("rainfall").unwrap();
    chart
        .controls_mut()
        .choose("region", Choice::only("Mountain"))
        .unwrap();
    chart
        .controls_mut()
        .choose("year", Choice::only("2022"))
        .unwrap();
    let scene = chart.snapshot(800);

    let bars: Vec<_> = scene.data().collect();
    let months: Vec<&str> = bars.iter().map(|(_, d)| d.category.as_str()).collect();
    assert_eq!(months, ["Jan", "Feb", "Mar", "Nov", "Dec"]);
    let values: Vec<f64> = bars.iter().map(|(_, d)| d.value).collect();
    assert_eq!(values, [14.2, 18.5, 25.7, 8.5, 10.1]);
    assert!(bars.iter().all(|(_, d)| d.series == "Mountain"));
    assert!(bars.iter().all(|(_, d)| d.group.as_deref() == Some("2022")));

    let ratio = rect_height(&bars[0].0.mark) / values[0];
    for ((p, _), v) in bars.iter().zip(&values) {
        assert!((rect_height(&p.mark) / v - ratio).abs() < 1e-9);
    }
    // single year: no captions
    assert!(captions(&scene).is_empty());
}

#[test]
fn grouped_bars_share_band_between_years() {
    let dash = dashboard();
    let scene = dash.chart("rainfall").unwrap().snapshot(800);
    // 24 periods, one observed region each
    assert_eq!(scene.data().count(), 24);
    assert_eq!(captions(&scene), ["2022", "2023"]);

    let jan: Vec<&Mark> = scene
        .data()
        .filter(|(_, d)| d.category == "Jan")
        .map(|(p, _)| &p.mark)
        .collect();
    assert_eq!(jan.len(), 2);
    match (jan[0], jan[1]) {
        (Mark::Rect { x: x0, width: w0, .. }, Mark::Rect { x: x1, .. }) => {
            assert!((x1 - x0 - w0 * 3.0).abs() < 1e-9, "years sit side by side");
        }
        _ => panic!("bars expected"),
    }
}

#[test]
fn bars_grow_with_a_per_series_stagger() {
    let dash = dashboard();
    let scene = dash.chart("rainfall").unwrap().snapshot(800);
    let delays: Vec<(String, f64)> = scene
        .data()
        .map(|(p, d)| (d.series.clone(), p.enter.map(|t| t.delay_ms).unwrap_or(-1.0)))
        .collect();
    assert!(delays.iter().any(|(s, d)| s == "Mountain" && *d == 0.0));
    assert!(delays.iter().any(|(s, d)| s == "Hill" && *d == 50.0));
    assert!(delays.iter().any(|(s, d)| s == "Terai" && *d == 100.0));
    assert_eq!(scene.duration_ms(), 900.0);
}

#[test]
fn bhaktapur_stack_and_overlay() {
    let mut dash = dashboard();
    let chart = dash.chart_mut("pollution").unwrap();
    chart
        .controls_mut()
        .choose("site", Choice::only("Bhaktapur"))
        .unwrap();
    let scene = chart.snapshot(800);

    let fine = scene.data().find(|(_, d)| d.series == "fine").unwrap();
    let coarse = scene.data().find(|(_, d)| d.series == "coarse").unwrap();
    let humidity = scene.data().find(|(_, d)| d.series == "humidity").unwrap();
    assert_eq!(fine.1.value, 178.4);
    assert_eq!(coarse.1.value, 338.1);
    assert_eq!(humidity.1.value, 37.0);

    let ratio = rect_height(&fine.0.mark) / rect_height(&coarse.0.mark);
    assert!((ratio - 178.4 / 338.1).abs() < 1e-9);

    // fine sits at the bottom, coarse directly on top of it
    match (&fine.0.mark, &coarse.0.mark) {
        (Mark::Rect { y: fy, .. }, Mark::Rect { y: cy, height: ch, .. }) => {
            assert!((cy + ch - fy).abs() < 1e-9);
        }
        _ => panic!("bars expected"),
    }

    // the only site is also the humidity maximum, so its marker sits on the top edge
    match &humidity.0.mark {
        Mark::Circle { center, radius, .. } => {
            assert_eq!(*radius, 4.0);
            assert!((center.y - 30.0).abs() < 1e-9);
        }
        other => panic!("expected a marker, got {other:?}"),
    }
}

#[test]
fn scatter_2023_has_twelve_points_and_a_trend() {
    let mut dash = dashboard();
    let chart = dash.chart_mut("climate").unwrap();
    chart
        .controls_mut()
        .choose("year", Choice::only("2023"))
        .unwrap();
    let scene = chart.snapshot(800);
    assert_eq!(scene.data().count(), 12);
    assert!(scene.data().all(|(_, d)| d.group.as_deref() == Some("2023")));
    let trend_paths = scene
        .with_role(|r| matches!(r, Role::Trend(_)))
        .filter(|p| matches!(p.mark, Mark::Path { .. }))
        .count();
    assert_eq!(trend_paths, 1);
}

#[test]
fn scatter_with_one_point_has_no_trend() {
    let mut data = sample();
    data.climate.truncate(1);
    let dash = Dashboard::from_dataset(data);
    let scene = dash.chart("climate").unwrap().snapshot(800);
    assert_eq!(scene.data().count(), 1);
    assert!(scene.trend().is_none());
}

#[test]
fn scatter_captions_only_for_years_with_data() {
    let mut data = sample();
    data.climate.retain(|r| r.year == 2023);
    data.climate.push(climadash::models::ScatterObservation::new(9.0, 60.0, "Jan", 2021));
    let dash = Dashboard::from_dataset(data);
    let scene = dash.chart("climate").unwrap().snapshot(800);
    assert_eq!(captions(&scene), ["2021", "2023"]);
}

#[test]
fn lines_have_one_path_per_year_and_hit_targets() {
    let dash = dashboard();
    let scene = dash.chart("temperature").unwrap().snapshot(800);
    let paths: Vec<&str> = scene
        .primitives
        .iter()
        .filter_map(|p| match &p.role {
            Role::Series(s) => Some(s.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(paths, ["2022", "2023"]);
    assert_eq!(scene.data().count(), 24);
    let targets = scene
        .with_role(|r| matches!(r, Role::HitTarget(_)))
        .count();
    assert_eq!(targets, 24);
    assert!(scene.with_role(|r| matches!(r, Role::Grid)).count() > 0);
}

#[test]
fn lines_follow_calendar_order_after_filtering() {
    let mut dash = dashboard();
    let chart = dash.chart_mut("temperature").unwrap();
    chart
        .controls_mut()
        .choose("month", Choice::only("June"))
        .unwrap();
    let scene = chart.snapshot(800);
    let markers: Vec<(&str, f64)> = scene
        .data()
        .map(|(_, d)| (d.category.as_str(), d.value))
        .collect();
    assert_eq!(markers, [("Jun", 24.8), ("Jun", 25.2)]);
}

#[test]
fn legends_list_visible_series() {
    let mut dash = dashboard();
    let chart = dash.chart_mut("rainfall").unwrap();
    chart
        .controls_mut()
        .choose("region", Choice::only("Hill"))
        .unwrap();
    let scene = chart.snapshot(800);
    let legend: Vec<&str> = scene
        .with_role(|r| matches!(r, Role::Legend))
        .filter_map(|p| match &p.mark {
            Mark::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(legend, ["Hill"]);

    let pollution = dash.chart("pollution").unwrap().snapshot(800);
    assert!(pollution.texts().any(|t| t == "Fine Particles"));
    assert!(pollution.texts().any(|t| t == "Coarse Particles"));
    assert!(pollution.texts().any(|t| t == "Humidity"));
}

#[test]
fn redraw_replaces_the_previous_scene() {
    let mut dash = dashboard();
    let chart = dash.chart_mut("rainfall").unwrap();
    let all = chart.snapshot(800).primitives.len();
    chart
        .controls_mut()
        .choose("year", Choice::only("2023"))
        .unwrap();
    let one_year = chart.snapshot(800).primitives.len();
    assert!(one_year < all);
    chart.controls_mut().reset();
    assert_eq!(chart.snapshot(800).primitives.len(), all);
}
