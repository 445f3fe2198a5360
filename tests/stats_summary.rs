use climadash::Chart;
use climadash::charts::Dashboard;
use climadash::data::sample;
use climadash::filter::Choice;
use climadash::stats::{extent, summarize};

#[test]
fn summary_handles_non_finite_and_median_even_odd() {
    // [1,2,3,4] -> median = (2+3)/2 = 2.5
    let even = summarize("even", &[4.0, 1.0, 3.0, 2.0]);
    assert_eq!(even.count, 4);
    assert_eq!(even.min, Some(1.0));
    assert_eq!(even.max, Some(4.0));
    assert_eq!(even.mean, Some(2.5));
    assert_eq!(even.median, Some(2.5));

    // NaN is ignored -> [10, 30], median 20
    let odd = summarize("odd", &[10.0, f64::NAN, 30.0, 20.0]);
    assert_eq!(odd.count, 3);
    assert_eq!(odd.median, Some(20.0));

    let empty = summarize("empty", &[]);
    assert_eq!(empty.count, 0);
    assert!(empty.min.is_none() && empty.mean.is_none() && empty.median.is_none());
}

#[test]
fn extent_of_nothing_is_none() {
    assert_eq!(extent(Vec::<f64>::new()), None);
    assert_eq!(extent([3.0, -1.0, 2.0]), Some((-1.0, 3.0)));
}

#[test]
fn rainfall_summary_counts_only_observed_months() {
    let mut dashboard = Dashboard::from_dataset(sample());
    let chart = dashboard.chart_mut("rainfall").unwrap();
    chart
        .controls_mut()
        .choose("region", Choice::only("Mountain"))
        .unwrap();
    chart
        .controls_mut()
        .choose("year", Choice::only("2022"))
        .unwrap();

    let summary = chart.summary();
    assert_eq!(summary.len(), 1);
    let s = &summary[0];
    assert_eq!(s.measure, "Mountain");
    assert_eq!(s.count, 5);
    assert_eq!(s.min, Some(8.5));
    assert_eq!(s.max, Some(25.7));
    assert_eq!(s.median, Some(14.2));
}

#[test]
fn pollution_summary_lists_segments_and_overlay() {
    let dashboard = Dashboard::from_dataset(sample());
    let summary = dashboard.chart("pollution").unwrap().summary();
    let names: Vec<&str> = summary.iter().map(|s| s.measure.as_str()).collect();
    assert_eq!(names, ["Fine Particles", "Coarse Particles", "Humidity"]);
    assert!(summary.iter().all(|s| s.count == 3));
    assert_eq!(summary[2].max, Some(42.0));
}
