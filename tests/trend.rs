use climadash::Chart;
use climadash::charts::Dashboard;
use climadash::data::sample;
use climadash::filter::Choice;
use climadash::stats::{Correlation, Trend};

fn covariance(points: &[(f64, f64)]) -> f64 {
    let n = points.len() as f64;
    let mx = points.iter().map(|p| p.0).sum::<f64>() / n;
    let my = points.iter().map(|p| p.1).sum::<f64>() / n;
    points.iter().map(|(x, y)| (x - mx) * (y - my)).sum::<f64>() / n
}

#[test]
fn exact_line_is_recovered() {
    let pts: Vec<(f64, f64)> = (0..10).map(|i| (i as f64, 2.0 * i as f64 + 1.0)).collect();
    let t = Trend::fit(&pts).unwrap();
    assert!((t.slope - 2.0).abs() < 1e-12);
    assert!((t.intercept - 1.0).abs() < 1e-12);
    assert_eq!(t.n, 10);
    assert_eq!(t.correlation(), Correlation::Positive);
}

#[test]
fn identical_x_gives_zero_slope() {
    let t = Trend::fit(&[(5.0, 1.0), (5.0, 9.0), (5.0, 4.0)]).unwrap();
    assert_eq!(t.slope, 0.0);
    assert!((t.intercept - 14.0 / 3.0).abs() < 1e-12);
}

#[test]
fn empty_input_has_no_fit() {
    assert!(Trend::fit(&[]).is_none());
}

#[test]
fn slope_sign_follows_covariance() {
    let sets: [&[(f64, f64)]; 3] = [
        &[(1.0, 10.0), (2.0, 8.0), (3.0, 3.0)],
        &[(1.0, 1.0), (2.0, 3.0), (4.0, 2.0), (8.0, 9.0)],
        &[(0.5, 4.0), (1.5, 4.5), (2.5, 1.0), (3.0, 0.0)],
    ];
    for pts in sets {
        let t = Trend::fit(pts).unwrap();
        assert_eq!(t.slope > 0.0, covariance(pts) > 0.0, "{pts:?}");
        assert_eq!(t.slope < 0.0, covariance(pts) < 0.0, "{pts:?}");
    }
    let down = Trend::fit(sets[0]).unwrap();
    assert_eq!(down.correlation(), Correlation::Negative);
    assert_eq!(down.correlation().to_string(), "Negative correlation");
}

#[test]
fn climate_trend_uses_the_filtered_year() {
    let mut dashboard = Dashboard::from_dataset(sample());
    let chart = dashboard.chart_mut("climate").unwrap();
    chart
        .controls_mut()
        .choose("year", Choice::only("2023"))
        .unwrap();
    assert_eq!(chart.subset_len(), 12);

    let t = chart.trend().unwrap();
    assert_eq!(t.n, 12);
    assert!((t.slope - 1.429173).abs() < 1e-5, "slope {}", t.slope);
    assert_eq!(t.correlation(), Correlation::Positive);

    let scene = chart.snapshot(800);
    assert_eq!(scene.trend(), Some(Correlation::Positive));
    assert!(scene.texts().any(|s| s == "Positive correlation"));
}
