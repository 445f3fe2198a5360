use climadash::Chart;
use climadash::charts::Dashboard;
use climadash::data::sample;
use climadash::filter::Choice;
use climadash::tooltip::{HoverTracker, TooltipLayer};
use climadash::viz::{Mark, Placement, Point, Role, Scene, TooltipContent};

const SETTLED: f64 = 10_000.0;

fn rainfall_mountain_2022() -> Scene {
    let mut dash = Dashboard::from_dataset(sample());
    let chart = dash.chart_mut("rainfall").unwrap();
    chart
        .controls_mut()
        .choose("region", Choice::only("Mountain"))
        .unwrap();
    chart
        .controls_mut()
        .choose("year", Choice::only("2022"))
        .unwrap();
    chart.snapshot(800)
}

fn rect_center(mark: &Mark) -> Point {
    match mark {
        Mark::Rect {
            x,
            y,
            width,
            height,
            ..
        } => Point::new(x + width / 2.0, y + height / 2.0),
        other => panic!("expected a bar, got {other:?}"),
    }
}

#[test]
fn guard_removes_its_tooltip() {
    let layer = TooltipLayer::new();
    let content = TooltipContent {
        lines: vec!["Jan 2023".into(), "Temp: 10°C".into()],
        placement: Placement::Pointer,
    };
    let a = layer.show("climate", &content, Point::new(5.0, 5.0));
    let b = layer.show("climate", &content, Point::new(6.0, 6.0));
    assert_eq!(layer.len(), 2);
    assert_ne!(a.id(), b.id());

    drop(a);
    assert_eq!(layer.len(), 1);
    assert_eq!(layer.active()[0].id, b.id());
    drop(b);
    assert!(layer.is_empty());
}

#[test]
fn floating_tooltip_follows_the_pointer() {
    let layer = TooltipLayer::new();
    let content = TooltipContent {
        lines: vec!["Kathmandu".into()],
        placement: Placement::Pointer,
    };
    let guard = layer.show("pollution", &content, Point::new(1.0, 1.0));
    guard.move_to(Point::new(40.0, 50.0));
    let active = layer.active();
    assert!(active[0].floating);
    assert_eq!(active[0].position, Point::new(40.0, 50.0));
}

#[test]
fn hovering_a_bar_shows_its_value() {
    let scene = rainfall_mountain_2022();
    let (index, bar) = scene
        .primitives
        .iter()
        .enumerate()
        .find(|(_, p)| matches!(&p.role, Role::Datum(d) if d.category == "Jan"))
        .unwrap();
    let center = rect_center(&bar.mark);

    let layer = TooltipLayer::new();
    let mut hover = HoverTracker::new();
    let hit = hover.update(&scene, SETTLED, Some(center), &layer, "rainfall");
    assert_eq!(hit, Some(index));

    let active = layer.active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].owner, "rainfall");
    assert_eq!(active[0].lines, ["14.2 mm"]);
    assert!(!active[0].floating);

    // hovered bar switches to its highlight mark
    let frame = scene.frame(SETTLED, hit);
    assert_eq!(frame[index].opacity(), 0.8);

    // pointer leaves the surface
    assert_eq!(hover.update(&scene, SETTLED, None, &layer, "rainfall"), None);
    assert!(layer.is_empty());
}

#[test]
fn growing_bars_answer_where_they_are_drawn() {
    let scene = rainfall_mountain_2022();
    let bar = scene.data().next().unwrap().0;
    let center = rect_center(&bar.mark);
    // zero height at the start
    assert_eq!(scene.hit_test(center, 0.0), None);
    // nearly grown, still inside the enter transition
    let hit = scene.hit_test(center, 700.0);
    assert!(hit.is_some());

    let layer = TooltipLayer::new();
    let mut hover = HoverTracker::new();
    hover.update(&scene, 700.0, Some(center), &layer, "rainfall");
    assert_eq!(layer.active()[0].lines, ["14.2 mm"]);
    // highlight waits for the bar to settle
    let frame = scene.frame(700.0, hit);
    assert!(frame[hit.unwrap()].opacity() < 1.0);
    assert_ne!(frame[hit.unwrap()], bar.hover.as_ref().unwrap().mark.clone().unwrap());
}

#[test]
fn line_markers_take_hover_before_they_settle() {
    let mut dash = Dashboard::from_dataset(sample());
    let chart = dash.chart_mut("temperature").unwrap();
    chart
        .controls_mut()
        .choose("year", Choice::only("2022"))
        .unwrap();
    let scene = chart.snapshot(800);
    let last = scene
        .with_role(|r| matches!(r, Role::HitTarget(_)))
        .last()
        .unwrap();
    let Mark::Circle { center, .. } = last.mark else {
        panic!("hit target should be a circle");
    };
    // the last marker's stagger alone is 1650 ms
    assert!(last.enter.unwrap().end_ms() > 3000.0);

    let layer = TooltipLayer::new();
    let mut hover = HoverTracker::new();
    assert!(hover.update(&scene, 100.0, Some(center), &layer, "temperature").is_some());
    assert_eq!(layer.active()[0].lines, ["11°C"]);
}

#[test]
fn dropping_the_tracker_clears_the_layer() {
    let scene = rainfall_mountain_2022();
    let center = rect_center(&scene.data().next().unwrap().0.mark);
    let layer = TooltipLayer::new();
    {
        let mut hover = HoverTracker::new();
        hover.update(&scene, SETTLED, Some(center), &layer, "rainfall");
        assert_eq!(layer.len(), 1);
    }
    assert!(layer.is_empty());
}

#[test]
fn repeated_hover_does_not_accumulate() {
    let scene = rainfall_mountain_2022();
    let center = rect_center(&scene.data().next().unwrap().0.mark);
    let layer = TooltipLayer::new();
    let mut hover = HoverTracker::new();
    for _ in 0..5 {
        hover.update(&scene, SETTLED, Some(center), &layer, "rainfall");
        hover.update(&scene, SETTLED, None, &layer, "rainfall");
    }
    hover.update(&scene, SETTLED, Some(center), &layer, "rainfall");
    assert_eq!(layer.len(), 1);
}

#[test]
fn anchored_line_tooltip_stays_put() {
    let mut dash = Dashboard::from_dataset(sample());
    let chart = dash.chart_mut("temperature").unwrap();
    chart
        .controls_mut()
        .choose("year", Choice::only("2023"))
        .unwrap();
    let scene = chart.snapshot(800);
    let target = scene
        .with_role(|r| matches!(r, Role::HitTarget(_)))
        .next()
        .unwrap();
    let Mark::Circle { center, .. } = target.mark else {
        panic!("hit target should be a circle");
    };

    let layer = TooltipLayer::new();
    let mut hover = HoverTracker::new();
    hover.update(&scene, SETTLED, Some(center), &layer, "temperature");
    let before = layer.active();
    assert_eq!(before.len(), 1);
    assert!(!before[0].floating);

    hover.update(
        &scene,
        SETTLED,
        Some(Point::new(center.x + 2.0, center.y)),
        &layer,
        "temperature",
    );
    assert_eq!(layer.active()[0].position, before[0].position);
}
